//! Composite adapter - routes requests between registered adapters.
//!
//! Each auth type is owned by the last registered adapter claiming it.
//! Type discovery asks adapters in registration order and takes the first
//! answer; authentication is then handed to the owner of that type alone.
//! Pre-auth hooks are broadcast to every adapter until one answers.

use std::collections::HashMap;
use std::fmt;

use axum::{extract::Request, response::Response};

use crate::auth::adapter::same_adapter;
use crate::auth::{AdapterRef, AuthAdapter, AuthEvent, AuthenticatedIdentity};
use crate::error::{AuthError, AuthResult};

/// What to remove from a [`CompositeAdapter`].
pub enum RemovalTarget {
    /// A registered adapter instance, compared by identity.
    Adapter(AdapterRef),
    /// The adapter currently owning this auth type.
    Type(String),
    /// Input that names neither; removal fails with
    /// [`AuthError::InvalidArgument`].
    Unsupported(String),
}

impl fmt::Debug for RemovalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalTarget::Adapter(adapter) => f
                .debug_tuple("Adapter")
                .field(&adapter.provides())
                .finish(),
            RemovalTarget::Type(auth_type) => f.debug_tuple("Type").field(auth_type).finish(),
            RemovalTarget::Unsupported(kind) => f.debug_tuple("Unsupported").field(kind).finish(),
        }
    }
}

impl From<AdapterRef> for RemovalTarget {
    fn from(adapter: AdapterRef) -> Self {
        RemovalTarget::Adapter(adapter)
    }
}

impl From<&AdapterRef> for RemovalTarget {
    fn from(adapter: &AdapterRef) -> Self {
        RemovalTarget::Adapter(AdapterRef::clone(adapter))
    }
}

impl From<&str> for RemovalTarget {
    fn from(auth_type: &str) -> Self {
        RemovalTarget::Type(auth_type.to_string())
    }
}

impl From<String> for RemovalTarget {
    fn from(auth_type: String) -> Self {
        RemovalTarget::Type(auth_type)
    }
}

/// Untyped input (admin payloads, config) names a type only as a string.
impl From<serde_json::Value> for RemovalTarget {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        let kind = match value {
            Value::String(auth_type) => return RemovalTarget::Type(auth_type),
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        RemovalTarget::Unsupported(kind.to_string())
    }
}

/// Adapter that aggregates other adapters and routes by auth type.
pub struct CompositeAdapter {
    adapters: Vec<AdapterRef>,
    /// Auth type -> index into `adapters` of its owner.
    type_map: HashMap<String, usize>,
    /// Children's auth types, first occurrence order.
    types: Vec<String>,
    self_type: Option<String>,
}

impl CompositeAdapter {
    /// Create a composite, registering `adapters` in order.
    pub fn new(adapters: impl IntoIterator<Item = AdapterRef>) -> Self {
        let mut composite = Self {
            adapters: Vec::new(),
            type_map: HashMap::new(),
            types: Vec::new(),
            self_type: None,
        };
        for adapter in adapters {
            composite.add_adapter(adapter);
        }
        composite
    }

    /// Create a composite that also answers to `self_type`, so an outer
    /// registry can address it as one named adapter.
    pub fn with_self_type(
        adapters: impl IntoIterator<Item = AdapterRef>,
        self_type: impl Into<String>,
    ) -> Self {
        let mut composite = Self::new(adapters);
        composite.self_type = Some(self_type.into());
        composite
    }

    /// Register an adapter.
    ///
    /// Its auth types now route to it, replacing earlier owners. Returns
    /// `false` if the instance was already registered.
    pub fn add_adapter(&mut self, adapter: AdapterRef) -> bool {
        if self.position(&adapter).is_some() {
            return false;
        }

        tracing::debug!(types = ?adapter.provides(), "Registering auth adapter");
        self.adapters.push(adapter);
        self.reindex();
        true
    }

    /// Remove an adapter by instance or by an auth type it owns.
    ///
    /// Types the removed adapter owned fall back to the remaining adapters.
    /// Returns `Ok(false)` if nothing matched.
    pub fn remove_adapter(&mut self, target: impl Into<RemovalTarget>) -> AuthResult<bool> {
        let index = match target.into() {
            RemovalTarget::Adapter(adapter) => self.position(&adapter),
            RemovalTarget::Type(auth_type) => self.type_map.get(&auth_type).copied(),
            RemovalTarget::Unsupported(kind) => {
                return Err(AuthError::InvalidArgument(format!(
                    "cannot remove an adapter by {kind}; expected an adapter or an auth type"
                )));
            }
        };

        let Some(index) = index else {
            return Ok(false);
        };

        let removed = self.adapters.remove(index);
        tracing::debug!(types = ?removed.provides(), "Removed auth adapter");
        self.reindex();
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn self_type(&self) -> Option<&str> {
        self.self_type.as_deref()
    }

    /// The adapter that authenticates requests of `auth_type`.
    pub fn owner_of(&self, auth_type: &str) -> Option<&AdapterRef> {
        self.type_map
            .get(auth_type)
            .and_then(|&index| self.adapters.get(index))
    }

    fn position(&self, adapter: &AdapterRef) -> Option<usize> {
        self.adapters
            .iter()
            .position(|registered| same_adapter(registered, adapter))
    }

    /// Rebuild the type index from scratch; later adapters overwrite
    /// earlier owners.
    fn reindex(&mut self) {
        self.type_map.clear();
        self.types.clear();

        for (index, adapter) in self.adapters.iter().enumerate() {
            for auth_type in adapter.provides() {
                if self.type_map.insert(auth_type.clone(), index).is_none() {
                    self.types.push(auth_type);
                }
            }
        }
    }
}

impl Default for CompositeAdapter {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for CompositeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeAdapter")
            .field("adapters", &self.adapters.len())
            .field("provides", &self.provides())
            .finish()
    }
}

impl AuthAdapter for CompositeAdapter {
    fn provides(&self) -> Vec<String> {
        let mut types = self.types.clone();
        if let Some(self_type) = &self.self_type {
            if !types.contains(self_type) {
                types.push(self_type.clone());
            }
        }
        types
    }

    fn type_from_request(&self, request: &Request) -> Option<String> {
        self.adapters
            .iter()
            .find_map(|adapter| adapter.type_from_request(request))
    }

    fn authenticate(
        &self,
        request: &Request,
        response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        let Some(auth_type) = self.type_from_request(request) else {
            tracing::debug!("No adapter recognised the request");
            return None;
        };

        let Some(owner) = self.owner_of(&auth_type) else {
            tracing::warn!(auth_type = %auth_type, "No adapter owns resolved auth type");
            return None;
        };

        owner.authenticate(request, response, event)
    }

    fn pre_auth(&self, request: &Request, response: &mut Response) -> Option<Response> {
        self.adapters
            .iter()
            .find_map(|adapter| adapter.pre_auth(request, response))
    }
}

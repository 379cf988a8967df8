//! Adapter contract shared by every authentication strategy.
//!
//! An adapter claims one or more auth types, recognises requests of those
//! types, authenticates them, and may answer a request before
//! authentication runs (pre-auth).

use std::sync::Arc;

use axum::{extract::Request, response::Response};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::auth::AuthEvent;

/// Shared handle to a registered adapter.
///
/// Registries compare these by pointer, so two handles to the same
/// allocation are the same adapter.
pub type AdapterRef = Arc<dyn AuthAdapter>;

/// Identity established by a successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Principal name returned by the credential verifier.
    pub name: String,
    /// Auth type the identity was established with (e.g. `basic`).
    pub auth_type: String,
}

impl AuthenticatedIdentity {
    pub fn new(name: impl Into<String>, auth_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth_type: auth_type.into(),
        }
    }
}

/// Who the caller is, as far as authentication could tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    Authenticated(AuthenticatedIdentity),
    /// No credentials, or credentials nobody could vouch for.
    #[default]
    Guest,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    pub fn authenticated(&self) -> Option<&AuthenticatedIdentity> {
        match self {
            Identity::Authenticated(identity) => Some(identity),
            Identity::Guest => None,
        }
    }
}

/// Trait for authentication adapters.
///
/// Implementations range from a single header scheme to
/// [`CompositeAdapter`](crate::auth::CompositeAdapter), which routes between
/// other adapters and is itself an adapter.
pub trait AuthAdapter: Send + Sync {
    /// Auth types this adapter claims, in preference order.
    fn provides(&self) -> Vec<String>;

    /// Whether `auth_type` is one of [`provides`](Self::provides).
    fn matches(&self, auth_type: &str) -> bool {
        self.provides().iter().any(|t| t == auth_type)
    }

    /// The auth type this request declares, if this adapter recognises it.
    fn type_from_request(&self, request: &Request) -> Option<String>;

    /// Authenticate the request.
    ///
    /// `None` means unauthenticated. Adapters that refuse supplied
    /// credentials record the refusal on `event` and may add challenge
    /// headers to `response`.
    fn authenticate(
        &self,
        request: &Request,
        response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity>;

    /// Hook run before authentication.
    ///
    /// Returning a response ends request processing with that response.
    /// Adapters may decorate `response` without returning it.
    fn pre_auth(&self, _request: &Request, _response: &mut Response) -> Option<Response> {
        None
    }
}

/// Lets a registry be mutated while requests are being served.
///
/// Every contract call holds the read lock for its duration, so a writer
/// rebuilding the registry is never observed midway.
impl<A: AuthAdapter> AuthAdapter for RwLock<A> {
    fn provides(&self) -> Vec<String> {
        self.read().provides()
    }

    fn matches(&self, auth_type: &str) -> bool {
        self.read().matches(auth_type)
    }

    fn type_from_request(&self, request: &Request) -> Option<String> {
        self.read().type_from_request(request)
    }

    fn authenticate(
        &self,
        request: &Request,
        response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        self.read().authenticate(request, response, event)
    }

    fn pre_auth(&self, request: &Request, response: &mut Response) -> Option<Response> {
        self.read().pre_auth(request, response)
    }
}

/// Pointer identity of an adapter, ignoring vtable differences.
pub(crate) fn same_adapter(a: &AdapterRef, b: &AdapterRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

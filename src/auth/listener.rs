//! Authentication Listener - drives the adapter contract for one request.

use std::sync::Arc;

use axum::{extract::Request, response::Response};

use crate::auth::{AdapterRef, AuthEvent, Identity};

/// Result of running authentication for a request.
#[derive(Debug)]
pub enum AuthFlow {
    /// A pre-auth hook answered the request.
    Respond(Response),
    /// Authentication ran; `event` holds the outcome and `prepared` carries
    /// headers adapters want on the eventual response.
    Continue {
        event: AuthEvent,
        prepared: Response,
    },
}

/// Runs pre-auth and authentication against a root adapter.
#[derive(Clone)]
pub struct AuthListener {
    adapter: AdapterRef,
}

impl AuthListener {
    pub fn new(adapter: AdapterRef) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &AdapterRef {
        &self.adapter
    }

    /// Authenticate a request.
    ///
    /// Order:
    /// 1. Pre-auth hooks, which may answer the request outright
    /// 2. Auth type discovery
    /// 3. Authentication by the adapter owning that type
    pub fn run(&self, request: &Request) -> AuthFlow {
        let mut prepared = Response::default();

        if let Some(response) = self.adapter.pre_auth(request, &mut prepared) {
            tracing::debug!(status = %response.status(), "Pre-auth answered request");
            return AuthFlow::Respond(response);
        }

        let mut event = AuthEvent::new();

        let Some(auth_type) = self.adapter.type_from_request(request) else {
            tracing::debug!(request_id = %event.request_id(), "No credentials; continuing as guest");
            return AuthFlow::Continue { event, prepared };
        };

        if !self.adapter.matches(&auth_type) {
            tracing::warn!(
                request_id = %event.request_id(),
                auth_type = %auth_type,
                "Request declared an auth type no adapter provides"
            );
            return AuthFlow::Continue { event, prepared };
        }

        event.set_auth_type(auth_type);

        if let Some(identity) = self.adapter.authenticate(request, &mut prepared, &mut event) {
            tracing::debug!(
                request_id = %event.request_id(),
                principal = %identity.name,
                auth_type = %identity.auth_type,
                "Request authenticated"
            );
            event.set_identity(Identity::Authenticated(identity));
        }

        AuthFlow::Continue { event, prepared }
    }
}

impl<A> From<Arc<A>> for AuthListener
where
    A: crate::auth::AuthAdapter + 'static,
{
    fn from(adapter: Arc<A>) -> Self {
        Self::new(adapter)
    }
}

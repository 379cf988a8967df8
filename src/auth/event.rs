//! Request-scoped authentication context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::Identity;

/// Authentication state for a single request.
///
/// Created by the listener before authentication runs and handed to
/// adapters, which may record the resolved type, the identity, or a
/// refusal of supplied credentials.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    request_id: Uuid,
    started_at: DateTime<Utc>,
    auth_type: Option<String>,
    identity: Identity,
    rejection: Option<String>,
}

impl AuthEvent {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started_at: Utc::now(),
            auth_type: None,
            identity: Identity::Guest,
            rejection: None,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Auth type the request resolved to, if any.
    pub fn auth_type(&self) -> Option<&str> {
        self.auth_type.as_deref()
    }

    pub fn set_auth_type(&mut self, auth_type: impl Into<String>) {
        self.auth_type = Some(auth_type.into());
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    /// Record that credentials were supplied but refused.
    ///
    /// The first reason wins.
    pub fn reject(&mut self, reason: impl Into<String>) {
        if self.rejection.is_none() {
            self.rejection = Some(reason.into());
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

impl Default for AuthEvent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_event_is_guest() {
        let event = AuthEvent::new();
        assert_eq!(event.identity(), &Identity::Guest);
        assert!(event.auth_type().is_none());
        assert!(!event.is_rejected());
    }

    #[test]
    fn test_first_rejection_wins() {
        let mut event = AuthEvent::new();
        event.reject("bad password");
        event.reject("expired");
        assert_eq!(event.rejection(), Some("bad password"));
    }

    #[test]
    fn test_events_get_distinct_ids() {
        assert_ne!(AuthEvent::new().request_id(), AuthEvent::new().request_id());
    }
}

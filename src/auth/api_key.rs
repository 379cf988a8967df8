//! API key header adapter for agent/service clients.

use axum::{extract::Request, http::HeaderName, response::Response};

use crate::auth::{AuthAdapter, AuthEvent, AuthenticatedIdentity, Credential, VerifierRef};

/// Auth type served by [`ApiKeyAdapter`].
pub const API_KEY_TYPE: &str = "api-key";

/// Default header carrying the key.
pub const DEFAULT_API_KEY_HEADER: &str = "x-api-key";

/// Adapter for keys sent in a dedicated header.
pub struct ApiKeyAdapter {
    header: HeaderName,
    verifier: VerifierRef,
}

impl ApiKeyAdapter {
    pub fn new(header: HeaderName, verifier: VerifierRef) -> Self {
        Self { header, verifier }
    }

    /// Adapter reading `X-API-Key`.
    pub fn with_default_header(verifier: VerifierRef) -> Self {
        Self::new(HeaderName::from_static(DEFAULT_API_KEY_HEADER), verifier)
    }

    fn api_key<'r>(&self, request: &'r Request) -> Option<&'r str> {
        request
            .headers()
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl AuthAdapter for ApiKeyAdapter {
    fn provides(&self) -> Vec<String> {
        vec![API_KEY_TYPE.to_string()]
    }

    fn type_from_request(&self, request: &Request) -> Option<String> {
        self.api_key(request).map(|_| API_KEY_TYPE.to_string())
    }

    fn authenticate(
        &self,
        request: &Request,
        _response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        let api_key = self.api_key(request)?;

        match self.verifier.verify(&Credential::ApiKey(api_key.to_string())) {
            Some(principal) => Some(AuthenticatedIdentity::new(principal, API_KEY_TYPE)),
            None => {
                tracing::warn!(
                    request_id = %event.request_id(),
                    key_prefix = %key_prefix(api_key),
                    "Invalid API key attempted"
                );
                event.reject("invalid API key");
                None
            }
        }
    }
}

/// First eight characters of a key, safe to log.
fn key_prefix(key: &str) -> &str {
    let end = key.char_indices().nth(8).map_or(key.len(), |(i, _)| i);
    &key[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;

    use crate::auth::{ConfiguredCredential, CredentialKind, StaticCredentials};

    fn adapter() -> ApiKeyAdapter {
        let credentials = StaticCredentials::new(vec![ConfiguredCredential {
            id: "key-1".to_string(),
            principal: "agent-001".to_string(),
            kind: CredentialKind::ApiKey,
            username: None,
            secret: "sk-test-key-12345".to_string(),
        }]);
        ApiKeyAdapter::with_default_header(Arc::new(credentials))
    }

    fn request(key: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(key) = key {
            builder = builder.header("X-API-Key", key);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_claims_requests_with_a_key() {
        let adapter = adapter();
        assert_eq!(adapter.provides(), vec![API_KEY_TYPE]);
        assert_eq!(
            adapter.type_from_request(&request(Some("anything"))),
            Some(API_KEY_TYPE.to_string())
        );
        assert_eq!(adapter.type_from_request(&request(Some("  "))), None);
        assert_eq!(adapter.type_from_request(&request(None)), None);
    }

    #[test]
    fn test_valid_key() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity = adapter()
            .authenticate(&request(Some("sk-test-key-12345")), &mut response, &mut event)
            .unwrap();

        assert_eq!(identity.name, "agent-001");
        assert_eq!(identity.auth_type, API_KEY_TYPE);
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity = adapter().authenticate(&request(Some("wrong")), &mut response, &mut event);

        assert!(identity.is_none());
        assert_eq!(event.rejection(), Some("invalid API key"));
    }

    #[test]
    fn test_key_prefix_respects_char_boundaries() {
        assert_eq!(key_prefix("sk-test-key-12345"), "sk-test-");
        assert_eq!(key_prefix("short"), "short");
        assert_eq!(key_prefix("ééééééééé"), "éééééééé");
    }

    #[test]
    fn test_custom_header() {
        let adapter = ApiKeyAdapter::new(
            HeaderName::from_static("x-service-token"),
            Arc::new(|_: &Credential| Some("svc".to_string())),
        );
        let request = Request::builder()
            .uri("/")
            .header("X-Service-Token", "abc")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            adapter.type_from_request(&request),
            Some(API_KEY_TYPE.to_string())
        );
    }
}

//! HTTP `Authorization` header adapter (Basic and Bearer schemes).

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, header::WWW_AUTHENTICATE, HeaderValue},
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::auth::{
    AuthAdapter, AuthEvent, AuthenticatedIdentity, Credential, VerifierRef,
};

/// `Authorization` scheme handled by [`HttpAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpScheme {
    Basic,
    Bearer,
}

impl HttpScheme {
    /// Auth type this scheme is registered under.
    pub fn auth_type(self) -> &'static str {
        match self {
            HttpScheme::Basic => "basic",
            HttpScheme::Bearer => "bearer",
        }
    }

    /// Scheme token as written in challenges.
    fn challenge_name(self) -> &'static str {
        match self {
            HttpScheme::Basic => "Basic",
            HttpScheme::Bearer => "Bearer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("basic") {
            Some(HttpScheme::Basic)
        } else if name.eq_ignore_ascii_case("bearer") {
            Some(HttpScheme::Bearer)
        } else {
            None
        }
    }
}

/// Adapter for `Authorization: <scheme> <credentials>` headers.
pub struct HttpAdapter {
    schemes: Vec<HttpScheme>,
    realm: String,
    verifier: VerifierRef,
}

impl HttpAdapter {
    /// Create an adapter accepting `schemes`, in that preference order.
    pub fn new(schemes: Vec<HttpScheme>, realm: impl Into<String>, verifier: VerifierRef) -> Self {
        Self {
            schemes,
            realm: realm.into(),
            verifier,
        }
    }

    /// Split the header into an enabled scheme and its parameter.
    fn credentials<'r>(&self, request: &'r Request) -> Option<(HttpScheme, &'r str)> {
        let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
        let (name, rest) = header.trim().split_once(' ')?;
        let scheme = HttpScheme::parse(name)?;
        self.schemes
            .contains(&scheme)
            .then_some((scheme, rest.trim()))
    }

    fn decode(scheme: HttpScheme, param: &str) -> Option<Credential> {
        match scheme {
            HttpScheme::Basic => {
                let decoded = STANDARD.decode(param).ok()?;
                let decoded = String::from_utf8(decoded).ok()?;
                let (username, password) = decoded.split_once(':')?;
                Some(Credential::Basic {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            HttpScheme::Bearer if !param.is_empty() => Some(Credential::Bearer(param.to_string())),
            HttpScheme::Bearer => None,
        }
    }

    fn challenge(&self, scheme: HttpScheme, response: &mut Response) {
        let value = format!(
            "{} realm=\"{}\"",
            scheme.challenge_name(),
            self.realm.replace('"', "")
        );
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().append(WWW_AUTHENTICATE, value);
        }
    }
}

impl AuthAdapter for HttpAdapter {
    fn provides(&self) -> Vec<String> {
        self.schemes
            .iter()
            .map(|scheme| scheme.auth_type().to_string())
            .collect()
    }

    fn type_from_request(&self, request: &Request) -> Option<String> {
        self.credentials(request)
            .map(|(scheme, _)| scheme.auth_type().to_string())
    }

    fn authenticate(
        &self,
        request: &Request,
        response: &mut Response,
        event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        let (scheme, param) = self.credentials(request)?;

        let principal = Self::decode(scheme, param)
            .and_then(|credential| self.verifier.verify(&credential));

        match principal {
            Some(name) => {
                tracing::debug!(
                    request_id = %event.request_id(),
                    auth_type = scheme.auth_type(),
                    principal = %name,
                    "HTTP credentials accepted"
                );
                Some(AuthenticatedIdentity::new(name, scheme.auth_type()))
            }
            None => {
                tracing::warn!(
                    request_id = %event.request_id(),
                    auth_type = scheme.auth_type(),
                    "Invalid HTTP credentials attempted"
                );
                event.reject(format!("invalid {} credentials", scheme.auth_type()));
                self.challenge(scheme, response);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;

    fn verifier() -> VerifierRef {
        Arc::new(|credential: &Credential| match credential {
            Credential::Basic { username, password } if username == "alice" && password == "s3cret" => {
                Some("alice".to_string())
            }
            Credential::Bearer(token) if token == "good-token" => Some("svc".to_string()),
            _ => None,
        })
    }

    fn adapter() -> HttpAdapter {
        HttpAdapter::new(vec![HttpScheme::Basic, HttpScheme::Bearer], "api", verifier())
    }

    fn request(authorization: &str) -> Request {
        Request::builder()
            .uri("/")
            .header(AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap()
    }

    fn basic(user_pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(user_pass))
    }

    #[test]
    fn test_provides_enabled_schemes() {
        assert_eq!(adapter().provides(), vec!["basic", "bearer"]);

        let bearer_only = HttpAdapter::new(vec![HttpScheme::Bearer], "api", verifier());
        assert_eq!(bearer_only.provides(), vec!["bearer"]);
    }

    #[test]
    fn test_type_from_request() {
        let adapter = adapter();
        assert_eq!(
            adapter.type_from_request(&request("Bearer abc")),
            Some("bearer".to_string())
        );
        assert_eq!(
            adapter.type_from_request(&request("basic Zm9vOmJhcg==")),
            Some("basic".to_string())
        );
        assert_eq!(adapter.type_from_request(&request("Digest abc")), None);

        let no_header = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(adapter.type_from_request(&no_header), None);
    }

    #[test]
    fn test_disabled_scheme_is_not_claimed() {
        let bearer_only = HttpAdapter::new(vec![HttpScheme::Bearer], "api", verifier());
        assert_eq!(bearer_only.type_from_request(&request(&basic("alice:s3cret"))), None);
    }

    #[test]
    fn test_valid_basic_credentials() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity = adapter()
            .authenticate(&request(&basic("alice:s3cret")), &mut response, &mut event)
            .unwrap();

        assert_eq!(identity, AuthenticatedIdentity::new("alice", "basic"));
        assert!(!event.is_rejected());
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_valid_bearer_token() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity = adapter()
            .authenticate(&request("Bearer good-token"), &mut response, &mut event)
            .unwrap();

        assert_eq!(identity, AuthenticatedIdentity::new("svc", "bearer"));
    }

    #[test]
    fn test_invalid_credentials_are_rejected_with_challenge() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity =
            adapter().authenticate(&request(&basic("alice:wrong")), &mut response, &mut event);

        assert!(identity.is_none());
        assert!(event.is_rejected());
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Basic realm=\"api\"");
    }

    #[test]
    fn test_malformed_basic_credentials_are_rejected() {
        let mut response = Response::default();
        let mut event = AuthEvent::new();

        let identity =
            adapter().authenticate(&request("Basic not-base64!"), &mut response, &mut event);

        assert!(identity.is_none());
        assert!(event.is_rejected());
    }
}

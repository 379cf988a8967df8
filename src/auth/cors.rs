//! CORS preflight handling as a pre-auth hook.
//!
//! Browsers send preflight requests without credentials, so they have to be
//! answered before authentication runs.

use axum::{
    extract::Request,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
            ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
        },
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::auth::{AuthAdapter, AuthEvent, AuthenticatedIdentity};

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

/// Adapter that only contributes a pre-auth hook.
///
/// It claims no auth types and never authenticates.
pub struct CorsPreflightAdapter {
    allowed_origins: Vec<String>,
    max_age_secs: u64,
}

impl CorsPreflightAdapter {
    /// `*` in `allowed_origins` allows any origin.
    pub fn new(allowed_origins: Vec<String>, max_age_secs: u64) -> Self {
        Self {
            allowed_origins,
            max_age_secs,
        }
    }

    fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    fn is_allowed(&self, origin: &str) -> bool {
        self.allows_any()
            || self
                .allowed_origins
                .iter()
                .any(|o| o.eq_ignore_ascii_case(origin))
    }

    fn preflight(&self, request: &Request, allow_origin: HeaderValue) -> Response {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();

        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = request.headers().get(ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age_secs));
        headers.append(VARY, HeaderValue::from_static("origin"));

        response
    }
}

impl AuthAdapter for CorsPreflightAdapter {
    fn provides(&self) -> Vec<String> {
        Vec::new()
    }

    fn type_from_request(&self, _request: &Request) -> Option<String> {
        None
    }

    fn authenticate(
        &self,
        _request: &Request,
        _response: &mut Response,
        _event: &mut AuthEvent,
    ) -> Option<AuthenticatedIdentity> {
        None
    }

    fn pre_auth(&self, request: &Request, response: &mut Response) -> Option<Response> {
        let origin = request.headers().get(ORIGIN)?;
        let origin_str = origin.to_str().ok()?;

        if !self.is_allowed(origin_str) {
            tracing::debug!(origin = %origin_str, "Origin not allowed for CORS");
            return None;
        }

        let allow_origin = if self.allows_any() {
            HeaderValue::from_static("*")
        } else {
            origin.clone()
        };

        let is_preflight = request.method() == Method::OPTIONS
            && request.headers().contains_key(ACCESS_CONTROL_REQUEST_METHOD);
        if is_preflight {
            tracing::debug!(origin = %origin_str, "Answering CORS preflight");
            return Some(self.preflight(request, allow_origin));
        }

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.append(VARY, HeaderValue::from_static("origin"));
        None
    }
}

//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{AuthEvent, AuthFlow, AuthListener, Identity};

/// Error response for authentication failures.
#[derive(Debug, Serialize)]
pub struct AuthRejection {
    pub error: String,
    pub code: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Authenticate every request through the listener.
///
/// Pre-auth answers are returned as-is. Refused credentials end the request
/// with 401 and any challenge headers. Otherwise the [`AuthEvent`] and
/// [`Identity`] are added to request extensions and headers prepared by
/// adapters are copied onto the handler's response.
pub async fn authenticate(
    State(listener): State<AuthListener>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let (event, prepared) = match listener.run(&request) {
        AuthFlow::Respond(response) => return response,
        AuthFlow::Continue { event, prepared } => (event, prepared),
    };
    let (prepared, _) = prepared.into_parts();

    if let Some(reason) = event.rejection() {
        tracing::debug!(request_id = %event.request_id(), reason = %reason, "Credentials refused");
        let mut response = AuthRejection {
            error: "Invalid credentials".to_string(),
            code: "INVALID_CREDENTIALS".to_string(),
        }
        .into_response();
        response.headers_mut().extend(prepared.headers);
        return response;
    }

    request.extensions_mut().insert(event.identity().clone());
    request.extensions_mut().insert(event);

    let mut response = next.run(request).await;
    response.headers_mut().extend(prepared.headers);
    response
}

/// Middleware that requires an authenticated identity.
pub async fn require_identity(request: Request<Body>, next: Next) -> Result<Response, AuthRejection> {
    let authenticated = request
        .identity()
        .is_some_and(Identity::is_authenticated);

    if !authenticated {
        return Err(AuthRejection {
            error: "Authentication required".to_string(),
            code: "UNAUTHENTICATED".to_string(),
        });
    }

    Ok(next.run(request).await)
}

/// Extension trait to extract auth info from request extensions.
pub trait AuthExtensions {
    fn auth_event(&self) -> Option<&AuthEvent>;
    fn identity(&self) -> Option<&Identity>;
}

impl<B> AuthExtensions for Request<B> {
    fn auth_event(&self) -> Option<&AuthEvent> {
        self.extensions().get()
    }

    fn identity(&self) -> Option<&Identity> {
        self.extensions().get()
    }
}

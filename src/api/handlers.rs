//! HTTP request handlers.

use axum::{extract::State, Extension, Json};

use crate::api::types::*;
use crate::auth::{AuthEvent, AuthListener};
use crate::error::{AuthError, AuthResult};

/// Health check.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(listener): State<AuthListener>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        auth_types: listener.adapter().provides(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Get the authenticated caller.
///
/// GET /v1/auth/me
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current identity", body = CurrentIdentity),
        (status = 401, description = "Not authenticated")
    ),
    security(("basic_auth" = []), ("bearer_auth" = []), ("api_key" = [])),
    tag = "auth"
)]
pub async fn get_current_user(
    Extension(event): Extension<AuthEvent>,
) -> AuthResult<Json<CurrentIdentity>> {
    let identity = event
        .identity()
        .authenticated()
        .ok_or_else(|| AuthError::Unauthorized("no authenticated identity".to_string()))?;

    Ok(Json(CurrentIdentity {
        name: identity.name.clone(),
        auth_type: identity.auth_type.clone(),
        request_id: event.request_id().to_string(),
        authenticated_at: event.started_at().to_rfc3339(),
    }))
}

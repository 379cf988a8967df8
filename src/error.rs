//! Error types for Gatekeep.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for Gatekeep operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AuthError::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                msg.clone(),
                None,
            ),
            AuthError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            AuthError::Config(e) => {
                tracing::error!(error = %e, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    "Configuration error".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for Gatekeep operations.
pub type AuthResult<T> = Result<T, AuthError>;

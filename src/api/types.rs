//! API request and response types.

use serde::Serialize;
use utoipa::ToSchema;

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Auth types the service accepts.
    pub auth_types: Vec<String>,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Authentication ====================

/// The caller as seen by authentication.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentIdentity {
    /// Principal name.
    pub name: String,
    /// Auth type used (e.g. `basic`, `api-key`).
    pub auth_type: String,
    /// Request identifier assigned during authentication.
    pub request_id: String,
    /// When authentication started.
    pub authenticated_at: String,
}

//! HTTP API layer for Gatekeep.
//!
//! Provides a health endpoint and the current-identity endpoint behind the
//! authentication middleware.

pub mod handlers;
mod routes;
mod types;

pub use routes::{build_router, ApiDoc};
pub use types::{CurrentIdentity, HealthResponse};

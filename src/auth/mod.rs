//! Authentication module for Gatekeep.
//!
//! Adapters implement one authentication mechanism each:
//! - HTTP: `Authorization` header, Basic and Bearer schemes
//! - API Key: dedicated header for agent/service clients
//! - CORS: preflight answers before authentication
//!
//! The composite adapter routes between them; the listener and middleware
//! run the composite for every HTTP request.

mod adapter;
mod api_key;
mod composite;
mod cors;
mod credentials;
mod event;
mod http;
mod listener;
mod middleware;
mod wiring;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::*;
pub use api_key::*;
pub use composite::*;
pub use cors::*;
pub use credentials::*;
pub use event::*;
pub use http::*;
pub use listener::*;
pub use middleware::*;
pub use wiring::*;

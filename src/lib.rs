//! Gatekeep - composable authentication adapters.
//!
//! Each authentication mechanism is an [`auth::AuthAdapter`]. A
//! [`auth::CompositeAdapter`] aggregates them behind the same contract and
//! routes every request to the adapter owning the auth type it declares.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;

pub use auth::{
    AdapterRef, AuthAdapter, AuthEvent, AuthFlow, AuthListener, AuthenticatedIdentity,
    CompositeAdapter, Identity, RemovalTarget,
};
pub use error::{AuthError, AuthResult};

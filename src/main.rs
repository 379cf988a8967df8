//! Gatekeep - authentication gateway
//!
//! Serves the API behind a composite of authentication adapters built
//! from configuration.

use std::sync::Arc;

use tokio::net::TcpListener;

use gatekeep::api::build_router;
use gatekeep::auth::{composite_from_config, AuthListener, StaticCredentials};
use gatekeep::config::Config;
use gatekeep::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Gatekeep v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        credentials = config.auth.credentials.len(),
        "Configuration loaded"
    );

    let credentials = StaticCredentials::new(config.auth.credentials.clone());
    if credentials.is_empty() {
        tracing::warn!("No credentials configured - every caller will be a guest");
    }

    let composite = composite_from_config(&config.auth, Arc::new(credentials))?;
    let listener = AuthListener::from(Arc::new(composite));

    let app = build_router(listener);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let tcp = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(tcp, app).await?;

    Ok(())
}

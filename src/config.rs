//! Configuration module for Gatekeep.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredCredential;
use crate::error::AuthResult;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Authentication adapter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Extra auth type the root composite answers to.
    pub composite_type: Option<String>,
    /// Realm sent in `WWW-Authenticate` challenges.
    pub realm: String,
    /// Enabled `Authorization` schemes (`basic`, `bearer`), in order.
    /// Empty disables the HTTP adapter.
    pub http_schemes: Vec<String>,
    /// Header carrying API keys. Empty disables the API key adapter.
    pub api_key_header: String,
    pub cors: CorsConfig,
    /// Credentials accepted by the built-in verifier.
    pub credentials: Vec<ConfiguredCredential>,
}

/// CORS preflight configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; `*` allows any. Empty disables CORS handling.
    pub allowed_origins: Vec<String>,
    pub max_age_secs: u64,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GATEKEEP__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> AuthResult<Self> {
        let config = ConfigLoader::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with GATEKEEP_ prefix
            .add_source(
                Environment::with_prefix("GATEKEEP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_loader(config)
    }

    fn from_loader(loader: ConfigLoader) -> AuthResult<Self> {
        Ok(loader.try_deserialize()?)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            composite_type: None,
            realm: "gatekeep".to_string(),
            http_schemes: vec!["basic".to_string(), "bearer".to_string()],
            api_key_header: "x-api-key".to_string(),
            cors: CorsConfig::default(),
            credentials: Vec::new(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_secs: 600,
        }
    }
}

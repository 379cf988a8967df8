//! Builds the root composite adapter from configuration.

use std::sync::Arc;

use axum::http::HeaderName;

use crate::auth::{
    AdapterRef, ApiKeyAdapter, AuthAdapter, CompositeAdapter, CorsPreflightAdapter, HttpAdapter,
    HttpScheme, VerifierRef,
};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

/// Build the root composite.
///
/// Registration order: CORS preflight, HTTP schemes, API key. Adapters
/// whose configuration is empty are left out.
pub fn composite_from_config(
    config: &AuthConfig,
    verifier: VerifierRef,
) -> AuthResult<CompositeAdapter> {
    let mut adapters: Vec<AdapterRef> = Vec::new();

    if !config.cors.allowed_origins.is_empty() {
        adapters.push(Arc::new(CorsPreflightAdapter::new(
            config.cors.allowed_origins.clone(),
            config.cors.max_age_secs,
        )));
    }

    let schemes = config
        .http_schemes
        .iter()
        .map(|name| {
            HttpScheme::parse(name).ok_or_else(|| {
                AuthError::InvalidArgument(format!("unsupported HTTP auth scheme '{}'", name))
            })
        })
        .collect::<AuthResult<Vec<_>>>()?;
    if !schemes.is_empty() {
        adapters.push(Arc::new(HttpAdapter::new(
            schemes,
            config.realm.clone(),
            Arc::clone(&verifier),
        )));
    }

    if !config.api_key_header.is_empty() {
        let header = HeaderName::try_from(config.api_key_header.as_str()).map_err(|e| {
            AuthError::InvalidArgument(format!(
                "invalid API key header '{}': {}",
                config.api_key_header, e
            ))
        })?;
        adapters.push(Arc::new(ApiKeyAdapter::new(header, verifier)));
    }

    let composite = match &config.composite_type {
        Some(self_type) => CompositeAdapter::with_self_type(adapters, self_type.clone()),
        None => CompositeAdapter::new(adapters),
    };

    tracing::info!(
        adapters = composite.len(),
        types = ?composite.provides(),
        "Authentication adapters registered"
    );

    Ok(composite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credential;

    fn verifier() -> VerifierRef {
        Arc::new(|_: &Credential| -> Option<String> { None })
    }

    #[test]
    fn test_default_config_registers_http_and_api_key() {
        let composite = composite_from_config(&AuthConfig::default(), verifier()).unwrap();

        assert_eq!(composite.len(), 2);
        assert_eq!(composite.provides(), vec!["basic", "bearer", "api-key"]);
    }

    #[test]
    fn test_cors_and_self_type() {
        let mut config = AuthConfig::default();
        config.cors.allowed_origins = vec!["*".to_string()];
        config.composite_type = Some("gateway".to_string());

        let composite = composite_from_config(&config, verifier()).unwrap();

        assert_eq!(composite.len(), 3);
        assert!(composite.matches("gateway"));
    }

    #[test]
    fn test_empty_settings_disable_adapters() {
        let mut config = AuthConfig::default();
        config.http_schemes.clear();
        config.api_key_header.clear();

        let composite = composite_from_config(&config, verifier()).unwrap();
        assert!(composite.is_empty());
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let mut config = AuthConfig::default();
        config.http_schemes = vec!["digest".to_string()];

        let result = composite_from_config(&config, verifier());
        assert!(matches!(result, Err(AuthError::InvalidArgument(_))));
    }
}

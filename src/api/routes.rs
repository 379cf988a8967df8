//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{authenticate, require_identity, AuthListener};

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check, handlers::get_current_user),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::api::types::CurrentIdentity,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Gatekeep API",
        version = "0.1.0",
        description = "Composable authentication adapters behind one HTTP entry point",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Every route passes through the authentication listener; `/v1/auth/me`
/// additionally requires an authenticated identity.
pub fn build_router(listener: AuthListener) -> Router {
    let protected_routes = Router::new()
        .route("/v1/auth/me", get(handlers::get_current_user))
        .route_layer(middleware::from_fn(require_identity));

    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .with_state(listener.clone());

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(middleware::from_fn_with_state(listener, authenticate))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}

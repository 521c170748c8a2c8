//! REST API Routes Module
//!
//! Route handlers for the certificate registry, organized by concern:
//!
//! - Certificate registration, listing, and lookup
//! - Admin authentication (login/logout sessions)
//! - Certificate photo upload and retrieval
//! - Static branding assets (logo, header, gemstone image)
//! - Health check endpoints (Kubernetes-compatible)
//! - CORS support for browser-based clients

pub mod assets;
pub mod auth;
pub mod certificate;
pub mod health;
pub mod photo;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use gemcert_storage::{CertificateRegistry, CertificateStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::config::ApiConfig;
use crate::objects::ObjectStore;
use crate::sessions::SessionStore;

// Re-export route creation functions for convenience
pub use assets::create_router as assets_router;
pub use auth::create_router as auth_router;
pub use certificate::create_router as certificate_router;
pub use health::create_router as health_router;
pub use photo::create_router as photo_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /api/openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Create the complete API router.
///
/// Routes:
/// - Certificates under /api/certificates (register, list, lookup)
/// - Admin login/logout under /api/auth
/// - Photo objects under /api/photos
/// - Branding assets under /api/assets (public)
/// - Health checks at /health/* (public)
/// - OpenAPI spec at /api/openapi.json (when the openapi feature is on)
pub fn create_api_router(
    registry: Arc<CertificateRegistry>,
    store: Arc<dyn CertificateStore>,
    objects: Arc<dyn ObjectStore>,
    auth_config: AuthConfig,
    sessions: Arc<SessionStore>,
    api_config: &ApiConfig,
) -> Router {
    let api_routes = Router::new()
        .nest("/certificates", certificate::create_router(registry))
        .nest("/auth", auth::create_router(auth_config, sessions))
        .nest("/photos", photo::create_router(objects))
        .nest("/assets", assets::create_router(api_config.asset_dir.clone()));

    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::create_router(store));

    #[cfg(feature = "openapi")]
    {
        router = router.route("/api/openapi.json", axum::routing::get(openapi_json));
    }

    let cors = build_cors_layer(api_config);

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        cors.allow_origin(origins)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    }
}

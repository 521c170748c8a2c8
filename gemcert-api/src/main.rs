//! GEMCERT API Server Entry Point
//!
//! Bootstraps configuration, initializes the certificates schema, and
//! starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use gemcert_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AuthConfig, DbClient, DbConfig,
    ErrorCode, LocalObjectStore, PgCertificateStore, SessionStore,
};
use gemcert_core::SeedSet;
use gemcert_storage::{CertificateRegistry, CertificateStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_config = DbConfig::from_env();
    let db = DbClient::from_config(&db_config).map_err(internal)?;
    db.init_schema().await.map_err(internal)?;

    let api_config = ApiConfig::from_env();
    let auth_config = AuthConfig::from_env();
    if auth_config.password_hash.is_empty() {
        tracing::warn!("GEMCERT_ADMIN_PASSWORD_HASH is not set; staff login is disabled");
    }

    let store: Arc<dyn CertificateStore> = Arc::new(PgCertificateStore::new(db));
    let registry = Arc::new(CertificateRegistry::new(store.clone(), SeedSet::builtin()));
    let sessions = Arc::new(SessionStore::new(api_config.session_ttl));
    let objects = Arc::new(LocalObjectStore::new(api_config.photo_dir.clone()));

    let app: Router = create_api_router(
        registry,
        store,
        objects,
        auth_config,
        sessions,
        &api_config,
    );

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting GEMCERT API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| internal(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| internal(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn internal(reason: impl std::fmt::Display) -> ApiError {
    ApiError::new(ErrorCode::InternalError, reason.to_string())
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("GEMCERT_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("GEMCERT_API_PORT").ok())
        .unwrap_or_else(|| "5000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}

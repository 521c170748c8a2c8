//! GEMCERT API - REST API Layer
//!
//! HTTP layer for the gemological certificate registry. Exposes Axum REST
//! endpoints for certificate registration, case-insensitive lookup, staff
//! login sessions, photo objects, and branding assets, backed by the
//! Postgres certificate store with the built-in seed set as read fallback.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod objects;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod sessions;

// Re-export commonly used types
pub use auth::{hash_password, AuthConfig};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig, PgCertificateStore};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use objects::{LocalObjectStore, ObjectStore, UploadTarget};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use sessions::{Session, SessionStore};

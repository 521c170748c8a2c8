//! Certificate REST API Routes
//!
//! Axum handlers for registering certificates and looking them up by
//! certificate number. Lookup resolves across the persistent store and the
//! built-in seed set; registration races are settled by the storage layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use gemcert_core::{Certificate, CertificateDraft};
use gemcert_storage::CertificateRegistry;

use crate::error::{ApiError, ApiResult};

// ============================================================================
// SHARED STATE
// ============================================================================

/// Shared application state for certificate routes.
#[derive(Clone)]
pub struct CertificateState {
    pub registry: Arc<CertificateRegistry>,
}

impl CertificateState {
    pub fn new(registry: Arc<CertificateRegistry>) -> Self {
        Self { registry }
    }
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/certificates - Register a new certificate
#[utoipa::path(
    post,
    path = "/api/certificates",
    tag = "Certificates",
    request_body = CertificateDraft,
    responses(
        (status = 201, description = "Certificate registered", body = Certificate),
        (status = 400, description = "Required field missing", body = ApiError),
        (status = 409, description = "Certificate number already used", body = ApiError),
        (status = 503, description = "Store unavailable", body = ApiError),
    ),
)]
pub async fn register_certificate(
    State(state): State<Arc<CertificateState>>,
    Json(draft): Json<CertificateDraft>,
) -> ApiResult<(StatusCode, Json<Certificate>)> {
    let certificate = state.registry.register(&draft).await?;
    Ok((StatusCode::CREATED, Json(certificate)))
}

/// GET /api/certificates - List registered certificates, newest first
#[utoipa::path(
    get,
    path = "/api/certificates",
    tag = "Certificates",
    responses(
        (status = 200, description = "All registered certificates", body = Vec<Certificate>),
        (status = 503, description = "Store unavailable", body = ApiError),
    ),
)]
pub async fn list_certificates(
    State(state): State<Arc<CertificateState>>,
) -> ApiResult<Json<Vec<Certificate>>> {
    let certificates = state.registry.list().await?;
    Ok(Json(certificates))
}

/// GET /api/certificates/lookup/{number} - Look up a certificate by number
///
/// Resolution is case-insensitive. The path extractor percent-decodes the
/// segment exactly once before it arrives here; the seed set answers when
/// the store misses or is down.
#[utoipa::path(
    get,
    path = "/api/certificates/lookup/{number}",
    tag = "Certificates",
    params(
        ("number" = String, Path, description = "Certificate number (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Certificate details", body = Certificate),
        (status = 400, description = "Certificate number is required", body = ApiError),
        (status = 404, description = "Certificate not found", body = ApiError),
    ),
)]
pub async fn lookup_certificate(
    State(state): State<Arc<CertificateState>>,
    Path(number): Path<String>,
) -> ApiResult<Json<Certificate>> {
    let certificate = state
        .registry
        .lookup(&number)
        .await?
        .ok_or_else(|| ApiError::certificate_not_found(&number))?;
    Ok(Json(certificate))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the certificate routes router.
pub fn create_router(registry: Arc<CertificateRegistry>) -> axum::Router {
    let state = Arc::new(CertificateState::new(registry));

    axum::Router::new()
        .route("/", axum::routing::post(register_certificate))
        .route("/", axum::routing::get(list_certificates))
        .route("/lookup/:number", axum::routing::get(lookup_certificate))
        .with_state(state)
}

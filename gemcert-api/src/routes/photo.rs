//! Certificate Photo Routes
//!
//! Upload and retrieval of certificate photos through the object store
//! seam. Clients first request an upload target, send the bytes, then put
//! the returned reference string into the certificate draft's `imageUrl`.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::objects::{ObjectStore, ObjectStoreError, UploadTarget};

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct PhotoState {
    pub objects: Arc<dyn ObjectStore>,
}

#[derive(Debug, Deserialize)]
pub struct UploadTargetParams {
    /// Original file name; only the extension is kept.
    pub file_name: Option<String>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /api/photos/upload-target - Issue a fresh upload target
#[utoipa::path(
    post,
    path = "/api/photos/upload-target",
    tag = "Photos",
    params(
        ("file_name" = Option<String>, Query, description = "Original file name")
    ),
    responses(
        (status = 200, description = "Upload target issued", body = UploadTarget),
    ),
)]
pub async fn upload_target(
    State(state): State<Arc<PhotoState>>,
    Query(params): Query<UploadTargetParams>,
) -> Json<UploadTarget> {
    let file_name = params.file_name.unwrap_or_else(|| "photo.jpg".to_string());
    Json(state.objects.upload_target(&file_name))
}

/// PUT /api/photos/{name} - Store photo bytes
#[utoipa::path(
    put,
    path = "/api/photos/{name}",
    tag = "Photos",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    params(
        ("name" = String, Path, description = "Object name from the upload target")
    ),
    responses(
        (status = 201, description = "Photo stored"),
        (status = 400, description = "Invalid object name", body = ApiError),
    ),
)]
pub async fn put_photo(
    State(state): State<Arc<PhotoState>>,
    Path(name): Path<String>,
    bytes: Bytes,
) -> ApiResult<StatusCode> {
    let path = state
        .objects
        .resolve_stored_path(&name)
        .map_err(translate_object_error)?;
    state
        .objects
        .put_object(&path, &bytes)
        .await
        .map_err(translate_object_error)?;
    Ok(StatusCode::CREATED)
}

/// GET /api/photos/{name} - Fetch photo bytes
#[utoipa::path(
    get,
    path = "/api/photos/{name}",
    tag = "Photos",
    params(
        ("name" = String, Path, description = "Object name")
    ),
    responses(
        (status = 200, description = "Photo bytes"),
        (status = 404, description = "Photo not found", body = ApiError),
    ),
)]
pub async fn get_photo(
    State(state): State<Arc<PhotoState>>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let path = state
        .objects
        .resolve_stored_path(&name)
        .map_err(translate_object_error)?;
    let bytes = state
        .objects
        .fetch_object(&path)
        .await
        .map_err(translate_object_error)?;
    let content_type = content_type_for(&path);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

fn content_type_for(name: &str) -> &'static str {
    match std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn translate_object_error(err: ObjectStoreError) -> ApiError {
    match err {
        ObjectStoreError::NotFound { path } => ApiError::object_not_found(&path),
        ObjectStoreError::InvalidPath { path } => {
            ApiError::invalid_input(format!("Invalid object name: {}", path))
        }
        ObjectStoreError::Io { reason } => {
            tracing::error!(%reason, "object store I/O failure");
            ApiError::internal_error()
        }
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the photo routes router.
pub fn create_router(objects: Arc<dyn ObjectStore>) -> axum::Router {
    let state = Arc::new(PhotoState { objects });

    axum::Router::new()
        .route("/upload-target", axum::routing::post(upload_target))
        .route(
            "/:name",
            axum::routing::put(put_photo).get(get_photo),
        )
        .with_state(state)
}

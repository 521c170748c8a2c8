//! Static Asset Endpoints
//!
//! Serves the lab's branding images (logo, header background, gemstone
//! collection) from the configured asset directory. The logo falls back to
//! an inline SVG when the file is missing so the UI always has something to
//! render.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct AssetState {
    pub asset_dir: PathBuf,
}

const LOGO_FILE: &str = "logo.png";
const HEADER_FILE: &str = "header.jpg";
const GEMSTONE_FILE: &str = "gemstone.jpg";

const FALLBACK_LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40" viewBox="0 0 120 40">
  <rect width="120" height="40" fill="#FF4500"/>
  <text x="60" y="25" text-anchor="middle" fill="white" font-family="Arial, sans-serif" font-size="16" font-weight="bold">GIE LAB</text>
</svg>"##;

// ============================================================================
// HANDLERS
// ============================================================================

async fn serve_image(state: &AssetState, file: &str, content_type: &'static str) -> Option<Response> {
    match tokio::fs::read(state.asset_dir.join(file)).await {
        Ok(bytes) => Some(([(header::CONTENT_TYPE, content_type)], bytes).into_response()),
        Err(e) => {
            tracing::debug!(file, "asset not served: {}", e);
            None
        }
    }
}

/// GET /api/assets/logo - Lab logo, with inline SVG fallback
pub async fn logo(State(state): State<Arc<AssetState>>) -> Response {
    match serve_image(&state, LOGO_FILE, "image/png").await {
        Some(response) => response,
        None => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            FALLBACK_LOGO_SVG,
        )
            .into_response(),
    }
}

/// GET /api/assets/header - Header background image
pub async fn header_image(State(state): State<Arc<AssetState>>) -> Response {
    match serve_image(&state, HEADER_FILE, "image/jpeg").await {
        Some(response) => response,
        // Header has no inline fallback; try the gemstone image instead.
        None => match serve_image(&state, GEMSTONE_FILE, "image/jpeg").await {
            Some(response) => response,
            None => (StatusCode::NOT_FOUND, "Header image not found").into_response(),
        },
    }
}

/// GET /api/assets/gemstone - Gemstone collection image
pub async fn gemstone(State(state): State<Arc<AssetState>>) -> Response {
    match serve_image(&state, GEMSTONE_FILE, "image/jpeg").await {
        Some(response) => response,
        None => (StatusCode::NOT_FOUND, "Gemstone image not found").into_response(),
    }
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the asset routes router.
pub fn create_router(asset_dir: impl Into<PathBuf>) -> Router {
    let state = Arc::new(AssetState {
        asset_dir: asset_dir.into(),
    });

    Router::new()
        .route("/logo", get(logo))
        .route("/header", get(header_image))
        .route("/gemstone", get(gemstone))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logo_falls_back_to_svg() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AssetState {
            asset_dir: dir.path().to_path_buf(),
        });
        let response = logo(State(state)).await;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        assert_eq!(content_type, "image/svg+xml");
    }

    #[tokio::test]
    async fn test_logo_serves_file_when_present() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOGO_FILE), b"png bytes").unwrap();
        let state = Arc::new(AssetState {
            asset_dir: dir.path().to_path_buf(),
        });
        let response = logo(State(state)).await;
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[tokio::test]
    async fn test_missing_gemstone_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AssetState {
            asset_dir: dir.path().to_path_buf(),
        });
        let response = gemstone(State(state)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

//! Authentication Routes
//!
//! Login/logout for the staff account. Login verifies a salted SHA-256
//! digest and creates a session with an explicit lifecycle; logout revokes
//! the session token.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::error::{ApiError, ApiResult};
use crate::sessions::SessionStore;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub message: String,
    pub session_id: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LogoutRequest {
    pub session_id: String,
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub sessions: Arc<SessionStore>,
}

impl AuthState {
    pub fn new(config: AuthConfig, sessions: Arc<SessionStore>) -> Self {
        Self { config, sessions }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiError),
    ),
)]
pub async fn login(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if !state.config.verify(&req.username, &req.password) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    state.sessions.purge_expired();
    let session = state.sessions.create(&req.username);
    tracing::info!(username = %req.username, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        session_id: session.token,
        username: session.username,
    }))
}

/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    request_body = LogoutRequest,
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unknown session", body = ApiError),
    ),
)]
pub async fn logout(
    State(state): State<Arc<AuthState>>,
    Json(req): Json<LogoutRequest>,
) -> ApiResult<StatusCode> {
    if !state.sessions.revoke(&req.session_id) {
        return Err(ApiError::unauthorized("Unknown or expired session"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the auth routes router.
pub fn create_router(config: AuthConfig, sessions: Arc<SessionStore>) -> axum::Router {
    let state = Arc::new(AuthState::new(config, sessions));

    axum::Router::new()
        .route("/login", axum::routing::post(login))
        .route("/logout", axum::routing::post(logout))
        .with_state(state)
}

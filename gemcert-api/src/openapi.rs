//! OpenAPI Specification for the GEMCERT API
//!
//! Generates the OpenAPI document from the route annotations and schema
//! derives using utoipa.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::objects::UploadTarget;
use crate::routes::{auth, certificate, health, photo};
use crate::routes::auth::{LoginRequest, LoginResponse, LogoutRequest};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};

use gemcert_core::{Certificate, CertificateDraft};

/// OpenAPI document for the certificate registry API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GEMCERT API",
        version = "0.1.0",
        description = "Gemological certificate registry - registration, lookup, and verification of gemstone certificates",
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Certificates", description = "Certificate registration, listing, and case-insensitive lookup"),
        (name = "Auth", description = "Staff login and logout sessions"),
        (name = "Photos", description = "Certificate photo upload and retrieval"),
        (name = "Health", description = "Service health checks")
    ),
    paths(
        // === Certificate Routes ===
        certificate::register_certificate,
        certificate::list_certificates,
        certificate::lookup_certificate,

        // === Auth Routes ===
        auth::login,
        auth::logout,

        // === Photo Routes ===
        photo::upload_target,
        photo::put_photo,
        photo::get_photo,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            Certificate,
            CertificateDraft,
            ApiError,
            ErrorCode,
            UploadTarget,
            LoginRequest,
            LoginResponse,
            LogoutRequest,
            HealthResponse,
            HealthStatus,
            HealthDetails,
            ComponentHealth,
        )
    )
)]
pub struct ApiDoc;

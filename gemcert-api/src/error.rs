//! Error Types for the GEMCERT API
//!
//! Defines the structured error responses for the API layer: an ErrorCode
//! enum mapping to HTTP status codes, an ApiError struct serialized as JSON,
//! and the translation from workflow-level RegistryError values.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gemcert_core::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required field is missing from the request
    MissingField,

    /// Request contains invalid input data
    InvalidInput,

    // ========================================================================
    // Authentication Errors (401)
    // ========================================================================
    /// Request lacks valid credentials or session
    Unauthorized,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No certificate matches the requested number
    CertificateNotFound,

    /// Requested stored object does not exist
    ObjectNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    /// Certificate number is already used (case-insensitively)
    DuplicateCertificate,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Persistent store is temporarily unreachable
    StoreUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingField | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,

            ErrorCode::CertificateNotFound | ErrorCode::ObjectNotFound => StatusCode::NOT_FOUND,

            ErrorCode::DuplicateCertificate => StatusCode::CONFLICT,

            ErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::Unauthorized => "Authentication required",
            ErrorCode::CertificateNotFound => "Certificate not found",
            ErrorCode::ObjectNotFound => "Object not found",
            ErrorCode::DuplicateCertificate => "Certificate number already used",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StoreUnavailable => "Store temporarily unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create a CertificateNotFound error.
    pub fn certificate_not_found(number: &str) -> Self {
        Self::new(
            ErrorCode::CertificateNotFound,
            format!("No certificate found with number: {}", number),
        )
    }

    /// Create an ObjectNotFound error.
    pub fn object_not_found(name: &str) -> Self {
        Self::new(ErrorCode::ObjectNotFound, format!("Object {} not found", name))
    }

    /// Create a DuplicateCertificate error.
    pub fn duplicate_certificate(number: &str) -> Self {
        Self::new(
            ErrorCode::DuplicateCertificate,
            format!(
                "Certificate number {} has already been used. Please use a different number.",
                number
            ),
        )
    }

    /// Create an InternalError with a generic message. Detail belongs in the
    /// log, not in the response.
    pub fn internal_error() -> Self {
        Self::from_code(ErrorCode::InternalError)
    }

    /// Create a StoreUnavailable error.
    pub fn store_unavailable() -> Self {
        Self::from_code(ErrorCode::StoreUnavailable)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Implement IntoResponse for ApiError to enable automatic error handling
/// in Axum handlers.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Translate workflow errors into API errors.
///
/// Infrastructure detail is logged here and replaced with a generic message
/// so it never reaches the caller undecorated.
impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::MissingField { field } => ApiError::missing_field(&field),
            RegistryError::DuplicateCertificate { certificate_number } => {
                ApiError::duplicate_certificate(&certificate_number)
            }
            RegistryError::StoreUnavailable { reason } => {
                tracing::error!(%reason, "store unavailable");
                ApiError::store_unavailable()
            }
            RegistryError::Internal { reason } => {
                tracing::error!(%reason, "internal registry error");
                ApiError::internal_error()
            }
        }
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON serialization error: {:?}", err);
        ApiError::invalid_input(format!("Invalid JSON: {}", err))
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::CertificateNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::DuplicateCertificate.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::StoreUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_registry_error_translation() {
        let err: ApiError = RegistryError::MissingField {
            field: "gemstoneType".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::MissingField);
        assert!(err.message.contains("gemstoneType"));

        let err: ApiError = RegistryError::DuplicateCertificate {
            certificate_number: "GIE-2024-009999".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::DuplicateCertificate);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        // Infrastructure detail must not leak into the response.
        let err: ApiError = RegistryError::Internal {
            reason: "connection reset by peer at 10.0.0.3".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("10.0.0.3"));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::duplicate_certificate("GIE-2024-009999");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("DUPLICATE_CERTIFICATE"));
        assert!(json.contains("GIE-2024-009999"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }
}

//! Error types for registry operations

use thiserror::Error;

/// Storage layer errors.
///
/// Raw backend/driver errors never leave the store boundary; they are
/// translated into one of these variants (and logged there) first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A record whose certificate number normalizes to the same key already
    /// exists. Enforced atomically at insert time by every store.
    #[error("Duplicate certificate number: {certificate_number}")]
    DuplicateKey { certificate_number: String },

    /// The backing store cannot be reached (or timed out). Callers must
    /// treat this as "no authoritative answer", not as "record absent".
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    /// Any other backend failure.
    #[error("Storage backend error: {reason}")]
    Backend { reason: String },
}

/// Registry workflow errors.
///
/// `NotFound` is deliberately absent: a lookup miss is a valid outcome and
/// is represented as `Ok(None)`, never as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A required field is absent or empty. User-correctable.
    #[error("Required field missing: {field}")]
    MissingField { field: String },

    /// The certificate number is already used (case-insensitively), either
    /// in the persistent store or in the seed set. User-correctable by
    /// choosing a different number.
    #[error("Certificate number already used: {certificate_number}")]
    DuplicateCertificate { certificate_number: String },

    /// The persistent store is unreachable. Retryable; reads fall back to
    /// the seed set, writes are rejected.
    #[error("Store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Unexpected failure. Logged in full, surfaced generically.
    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { certificate_number } => {
                RegistryError::DuplicateCertificate { certificate_number }
            }
            StoreError::Unavailable { reason } => RegistryError::StoreUnavailable { reason },
            StoreError::Backend { reason } => RegistryError::Internal { reason },
        }
    }
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

//! GEMCERT Core - Entity Types
//!
//! Pure data structures for the gemological certificate registry.
//! All other crates depend on this. This crate contains the certificate
//! record, the identity normalizer, the built-in seed set, and the error
//! taxonomy - no storage or transport logic.

pub mod certificate;
pub mod error;
pub mod identity;
pub mod seed;

pub use certificate::{Certificate, CertificateDraft};
pub use error::{RegistryError, RegistryResult, StoreError};
pub use identity::CertificateNumber;
pub use seed::SeedSet;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Surrogate key type for certificate records (serial, assigned by storage).
pub type CertificateId = i64;

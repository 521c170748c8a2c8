//! GEMCERT Storage - Storage Trait, In-Memory Store, and Resolver
//!
//! Defines the storage abstraction for certificate records, an in-memory
//! implementation used by tests and seed-only deployments, the dual-source
//! resolver that presents one logical registry over the persistent store and
//! the read-only seed set, and the registration workflow.
//! The Postgres implementation lives in gemcert-api.

pub mod memory;
pub mod registry;
pub mod resolver;

pub use memory::InMemoryCertificateStore;
pub use registry::CertificateRegistry;
pub use resolver::DualSourceResolver;

use ::async_trait::async_trait;
use gemcert_core::{Certificate, CertificateDraft, CertificateNumber, StoreError};

/// Storage trait for certificate records.
///
/// Implementations must enforce case-insensitive uniqueness of the
/// certificate number atomically inside `create`; a prior `exists` check by
/// the caller is advisory only and does not close the race window between
/// check and write.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Look up a record by certificate number.
    ///
    /// Tries an exact match first, then falls back to a case-insensitive
    /// match. Returns at most one record; if the underlying data ever
    /// contains case-colliding duplicates, the most recently created one
    /// wins (highest `created_at`, then highest `id`). Absence is
    /// `Ok(None)`, never an error.
    async fn get(&self, number: &CertificateNumber) -> Result<Option<Certificate>, StoreError>;

    /// Whether a record with the same normalized key exists.
    async fn exists(&self, number: &CertificateNumber) -> Result<bool, StoreError>;

    /// Persist a new record, assigning `id` and `created_at`.
    ///
    /// Fails with `StoreError::DuplicateKey` when a case-insensitive
    /// collision is detected at insert time.
    async fn create(&self, draft: &CertificateDraft) -> Result<Certificate, StoreError>;

    /// List all records, newest first.
    async fn list(&self) -> Result<Vec<Certificate>, StoreError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

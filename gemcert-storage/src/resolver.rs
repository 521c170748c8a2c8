//! Dual-source resolver
//!
//! Presents one logical registry over the persistent store and the read-only
//! seed set. Precedence is fixed: the store answers first; the seed set is
//! consulted on a store miss or when the store reports itself unavailable.
//! For a fixed state of both sources the answers are deterministic.

use crate::CertificateStore;
use gemcert_core::{Certificate, CertificateNumber, SeedSet, StoreError};
use std::sync::Arc;

/// Single consistent lookup/existence view across the persistent store and
/// the seed set.
pub struct DualSourceResolver {
    store: Arc<dyn CertificateStore>,
    seeds: SeedSet,
}

impl DualSourceResolver {
    pub fn new(store: Arc<dyn CertificateStore>, seeds: SeedSet) -> Self {
        Self { store, seeds }
    }

    pub fn store(&self) -> &Arc<dyn CertificateStore> {
        &self.store
    }

    pub fn seeds(&self) -> &SeedSet {
        &self.seeds
    }

    /// Resolve a lookup across both sources.
    ///
    /// Store hit wins. On a store miss the seed set is searched by
    /// normalized key. `StoreError::Unavailable` triggers the seed fallback
    /// instead of failing the lookup; any other store error propagates.
    pub async fn resolve_get(
        &self,
        number: &CertificateNumber,
    ) -> Result<Option<Certificate>, StoreError> {
        match self.store.get(number).await {
            Ok(Some(certificate)) => Ok(Some(certificate)),
            Ok(None) => Ok(self.seeds.get(number).cloned()),
            Err(StoreError::Unavailable { reason }) => {
                tracing::warn!(%reason, "store unavailable, falling back to seed set");
                Ok(self.seeds.get(number).cloned())
            }
            Err(other) => Err(other),
        }
    }

    /// Whether either source has a record with the same normalized key.
    ///
    /// Used exclusively for uniqueness enforcement before creation. The
    /// store is asked first as a fast path, but the seed set is always
    /// consulted on a store miss: skipping it would let a new record collide
    /// with a sample number. An unavailable store propagates as an error
    /// here, because "no authoritative answer" must reject a write rather
    /// than permit a potential duplicate.
    pub async fn resolve_exists(&self, number: &CertificateNumber) -> Result<bool, StoreError> {
        if self.store.exists(number).await? {
            return Ok(true);
        }
        Ok(self.seeds.contains(number))
    }
}

//! In-memory certificate store
//!
//! Backs tests and seed-only deployments. Uniqueness is enforced under a
//! single write lock inside `create`, which makes it the authoritative
//! arbiter for concurrent registration attempts just like the unique index
//! in the Postgres implementation.

use crate::CertificateStore;
use ::async_trait::async_trait;
use gemcert_core::{Certificate, CertificateDraft, CertificateNumber, StoreError};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::RwLock;

/// In-memory implementation of [`CertificateStore`].
pub struct InMemoryCertificateStore {
    records: RwLock<Vec<Certificate>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryCertificateStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Simulate an unreachable backend. Every operation reports
    /// `StoreError::Unavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn lock_err() -> StoreError {
        StoreError::Backend {
            reason: "store lock poisoned".to_string(),
        }
    }
}

impl Default for InMemoryCertificateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CertificateStore for InMemoryCertificateStore {
    async fn get(&self, number: &CertificateNumber) -> Result<Option<Certificate>, StoreError> {
        self.check_available()?;
        let records = self.records.read().map_err(|_| Self::lock_err())?;

        // Exact match first.
        if let Some(found) = records
            .iter()
            .filter(|c| number.matches_exact(&c.certificate_number))
            .max_by_key(|c| (c.created_at, c.id))
        {
            return Ok(Some(found.clone()));
        }

        // Case-insensitive fallback; latest record wins on duplicates.
        Ok(records
            .iter()
            .filter(|c| number.matches_folded(&c.certificate_number))
            .max_by_key(|c| (c.created_at, c.id))
            .cloned())
    }

    async fn exists(&self, number: &CertificateNumber) -> Result<bool, StoreError> {
        self.check_available()?;
        let records = self.records.read().map_err(|_| Self::lock_err())?;
        Ok(records
            .iter()
            .any(|c| number.matches_folded(&c.certificate_number)))
    }

    async fn create(&self, draft: &CertificateDraft) -> Result<Certificate, StoreError> {
        self.check_available()?;
        let number = CertificateNumber::parse(&draft.certificate_number).map_err(|e| {
            StoreError::Backend {
                reason: format!("invalid certificate number reached store: {}", e),
            }
        })?;

        // Check and insert under one write lock: at most one of two
        // concurrent attempts for the same normalized key can commit.
        let mut records = self.records.write().map_err(|_| Self::lock_err())?;
        if records
            .iter()
            .any(|c| number.matches_folded(&c.certificate_number))
        {
            return Err(StoreError::DuplicateKey {
                certificate_number: draft.certificate_number.clone(),
            });
        }

        let certificate = Certificate {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            certificate_number: number.as_raw().to_string(),
            gemstone_type: draft.gemstone_type.clone(),
            carat_weight: draft.carat_weight.clone(),
            color: draft.color.clone(),
            clarity: draft.clarity.clone(),
            cut: draft.cut.clone(),
            polish: draft.polish.clone(),
            symmetry: draft.symmetry.clone(),
            fluorescence: draft.fluorescence.clone(),
            measurements: draft.measurements.clone(),
            origin: draft.origin.clone(),
            issue_date: draft.issue_date_or_today(),
            image_url: draft.image_url.clone(),
            created_at: chrono::Utc::now(),
        };
        records.push(certificate.clone());
        Ok(certificate)
    }

    async fn list(&self) -> Result<Vec<Certificate>, StoreError> {
        self.check_available()?;
        let records = self.records.read().map_err(|_| Self::lock_err())?;
        let mut all = records.clone();
        all.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(all)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(number: &str) -> CertificateDraft {
        CertificateDraft {
            certificate_number: number.to_string(),
            gemstone_type: "Natural Diamond".to_string(),
            carat_weight: "1.01".to_string(),
            color: "E".to_string(),
            clarity: "VS1".to_string(),
            cut: "Excellent".to_string(),
            polish: "Excellent".to_string(),
            symmetry: "Very Good".to_string(),
            fluorescence: "None".to_string(),
            measurements: "6.40 x 6.44 x 3.98 mm".to_string(),
            origin: "Natural".to_string(),
            issue_date: Some("2024-03-02".to_string()),
            image_url: None,
        }
    }

    fn number(raw: &str) -> CertificateNumber {
        CertificateNumber::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryCertificateStore::new();
        let a = store.create(&draft("CERT-A")).await.unwrap();
        let b = store.create(&draft("CERT-B")).await.unwrap();
        assert!(b.id > a.id);
        assert!(b.created_at >= a.created_at);
    }

    #[tokio::test]
    async fn test_create_stores_number_verbatim() {
        // Body-supplied numbers are persisted byte-for-byte; a percent
        // sequence is literal text, so the encoded and spaced forms are
        // distinct numbers.
        let store = InMemoryCertificateStore::new();
        let encoded = store.create(&draft("AB%20CD")).await.unwrap();
        assert_eq!(encoded.certificate_number, "AB%20CD");

        let spaced = store.create(&draft("AB CD")).await.unwrap();
        assert_eq!(spaced.certificate_number, "AB CD");

        let found = store.get(&number("ab%20cd")).await.unwrap().unwrap();
        assert_eq!(found, encoded);
    }

    #[tokio::test]
    async fn test_create_rejects_case_insensitive_duplicate() {
        let store = InMemoryCertificateStore::new();
        store.create(&draft("GIE-2024-009999")).await.unwrap();
        let err = store.create(&draft("gie-2024-009999")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_get_exact_match_beats_folded() {
        let store = InMemoryCertificateStore::new();
        let created = store.create(&draft("Cert-Mixed")).await.unwrap();

        let exact = store.get(&number("Cert-Mixed")).await.unwrap().unwrap();
        assert_eq!(exact, created);

        // Case-folded fallback still resolves, returning stored casing.
        let folded = store.get(&number("CERT-MIXED")).await.unwrap().unwrap();
        assert_eq!(folded.certificate_number, "Cert-Mixed");
    }

    #[tokio::test]
    async fn test_get_absent_is_none_not_error() {
        let store = InMemoryCertificateStore::new();
        assert!(store.get(&number("NOPE")).await.unwrap().is_none());
        assert!(!store.exists(&number("NOPE")).await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store_reports_unavailable() {
        let store = InMemoryCertificateStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get(&number("X")).await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(matches!(
            store.create(&draft("X")).await,
            Err(StoreError::Unavailable { .. })
        ));
        store.set_unavailable(false);
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = InMemoryCertificateStore::new();
        store.create(&draft("CERT-1")).await.unwrap();
        store.create(&draft("CERT-2")).await.unwrap();
        store.create(&draft("CERT-3")).await.unwrap();
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all[0].id > all[1].id);
        assert!(all[1].id > all[2].id);
    }
}

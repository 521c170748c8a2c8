//! Registration workflow
//!
//! Drives a single registration request through
//! validate -> uniqueness pre-check -> commit. The pre-check through the
//! resolver is advisory (it races with concurrent writers); the store's
//! `create` is the single source of truth, and a `DuplicateKey` raised there
//! means the race was lost, not that the server failed.

use crate::{CertificateStore, DualSourceResolver};
use gemcert_core::{
    Certificate, CertificateDraft, CertificateNumber, RegistryError, RegistryResult, SeedSet,
    StoreError,
};
use std::sync::Arc;

/// The certificate registry: registration workflow plus dual-source lookup.
pub struct CertificateRegistry {
    resolver: DualSourceResolver,
}

impl CertificateRegistry {
    pub fn new(store: Arc<dyn CertificateStore>, seeds: SeedSet) -> Self {
        Self {
            resolver: DualSourceResolver::new(store, seeds),
        }
    }

    pub fn resolver(&self) -> &DualSourceResolver {
        &self.resolver
    }

    /// Register a new certificate.
    ///
    /// Returns the fully materialized record on commit, or a typed error;
    /// never a partially constructed record.
    pub async fn register(&self, draft: &CertificateDraft) -> RegistryResult<Certificate> {
        draft.validate()?;
        let number = CertificateNumber::parse(&draft.certificate_number)?;

        // Advisory fast path; the storage constraint below is authoritative.
        if self.resolver.resolve_exists(&number).await? {
            return Err(RegistryError::DuplicateCertificate {
                certificate_number: number.as_raw().to_string(),
            });
        }

        match self.resolver.store().create(draft).await {
            Ok(certificate) => {
                tracing::info!(
                    certificate_number = %certificate.certificate_number,
                    id = certificate.id,
                    "certificate registered"
                );
                Ok(certificate)
            }
            // Lost the race between the pre-check and the write.
            Err(StoreError::DuplicateKey { certificate_number }) => {
                Err(RegistryError::DuplicateCertificate { certificate_number })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Look up a certificate across both sources. A miss is `Ok(None)`.
    pub async fn lookup(&self, raw_number: &str) -> RegistryResult<Option<Certificate>> {
        let number = CertificateNumber::parse(raw_number)?;
        Ok(self.resolver.resolve_get(&number).await?)
    }

    /// List persisted certificates, newest first. Seed records are a lookup
    /// fallback, not part of the listing.
    pub async fn list(&self) -> RegistryResult<Vec<Certificate>> {
        Ok(self.resolver.store().list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCertificateStore;
    use proptest::prelude::*;

    fn draft(number: &str) -> CertificateDraft {
        CertificateDraft {
            certificate_number: number.to_string(),
            gemstone_type: "Natural Diamond".to_string(),
            carat_weight: "1.25".to_string(),
            color: "D".to_string(),
            clarity: "VVS1".to_string(),
            cut: "Excellent".to_string(),
            polish: "Excellent".to_string(),
            symmetry: "Excellent".to_string(),
            fluorescence: "None".to_string(),
            measurements: "6.85 x 6.91 x 4.24 mm".to_string(),
            origin: "Natural".to_string(),
            issue_date: None,
            image_url: None,
        }
    }

    fn registry() -> (Arc<InMemoryCertificateStore>, CertificateRegistry) {
        let store = Arc::new(InMemoryCertificateStore::new());
        let registry = CertificateRegistry::new(store.clone(), SeedSet::builtin());
        (store, registry)
    }

    #[tokio::test]
    async fn test_register_then_lookup_every_casing() {
        let (_, registry) = registry();
        let created = registry.register(&draft("GIE-2024-009999")).await.unwrap();
        assert_eq!(created.certificate_number, "GIE-2024-009999");

        for query in [
            "GIE-2024-009999",
            "gie-2024-009999",
            "Gie-2024-009999",
        ] {
            let found = registry.lookup(query).await.unwrap().expect(query);
            assert_eq!(found, created);
        }
    }

    #[tokio::test]
    async fn test_percent_sequences_are_part_of_the_number() {
        // Path decoding happens once in the HTTP layer; by the time a value
        // reaches the registry a literal "%20" is number text, not an
        // escape for a space.
        let (_, registry) = registry();
        let created = registry.register(&draft("AB%20CD")).await.unwrap();
        assert_eq!(created.certificate_number, "AB%20CD");

        let found = registry
            .lookup("ab%20cd")
            .await
            .unwrap()
            .expect("stored record");
        assert_eq!(found, created);

        assert!(registry.lookup("AB CD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sequential_registrations_monotonic() {
        let (_, registry) = registry();
        let mut last_id = 0;
        let mut last_created_at = None;
        for n in ["CERT-A", "CERT-B", "CERT-C"] {
            let cert = registry.register(&draft(n)).await.unwrap();
            assert_eq!(cert.certificate_number, n);
            assert!(cert.id > last_id);
            if let Some(prev) = last_created_at {
                assert!(cert.created_at >= prev);
            }
            last_id = cert.id;
            last_created_at = Some(cert.created_at);
        }
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected_case_insensitively() {
        let (_, registry) = registry();
        registry.register(&draft("GIE-2024-009999")).await.unwrap();
        let err = registry
            .register(&draft("gie-2024-009999"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCertificate { .. }));

        // Repeating the rejected call is rejected again with the same kind.
        let again = registry
            .register(&draft("gie-2024-009999"))
            .await
            .unwrap_err();
        assert_eq!(err, again);
    }

    #[tokio::test]
    async fn test_seed_numbers_are_reserved() {
        let (_, registry) = registry();
        let err = registry
            .register(&draft("gie-2024-001234"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCertificate { .. }));
    }

    #[tokio::test]
    async fn test_missing_field_commits_nothing() {
        let (store, registry) = registry();
        let mut bad = draft("GIE-2024-010000");
        bad.gemstone_type = "".to_string();

        let err = registry.register(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MissingField { ref field } if field == "gemstoneType"
        ));

        let number = CertificateNumber::parse("GIE-2024-010000").unwrap();
        assert!(!store.exists(&number).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_lookup_survives_store_outage() {
        let (store, registry) = registry();
        store.set_unavailable(true);
        let found = registry
            .lookup("GIE-2024-001234")
            .await
            .unwrap()
            .expect("seed fallback");
        assert_eq!(found.gemstone_type, "Natural Diamond");
    }

    #[tokio::test]
    async fn test_register_rejected_while_store_unavailable() {
        let (store, registry) = registry();
        store.set_unavailable(true);
        let err = registry.register(&draft("GIE-2024-020000")).await.unwrap_err();
        assert!(matches!(err, RegistryError::StoreUnavailable { .. }));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_registration_single_winner() {
        // The pre-check can race; the store's create must let exactly one
        // of the two attempts commit.
        let (_, registry) = registry();
        let registry = Arc::new(registry);

        let a = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register(&draft("RACE-0001")).await })
        };
        let b = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.register(&draft("race-0001")).await })
        };

        let results = [a.await.unwrap(), b.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(RegistryError::DuplicateCertificate { .. })))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);

        let all = registry.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_distinct_numbers_all_register(numbers in proptest::collection::hash_set("[A-Z]{2}-[0-9]{4}", 1..8)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let store = Arc::new(InMemoryCertificateStore::new());
                let registry = CertificateRegistry::new(store, SeedSet::empty());
                let mut last_id = 0;
                for n in &numbers {
                    let cert = registry.register(&draft(n)).await.unwrap();
                    assert_eq!(&cert.certificate_number, n);
                    assert!(cert.id > last_id);
                    last_id = cert.id;
                }
                assert_eq!(registry.list().await.unwrap().len(), numbers.len());
            });
        }
    }
}

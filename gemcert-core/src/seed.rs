//! Built-in seed certificates
//!
//! A fixed, read-only set of sample records that exists independently of the
//! persistent store. Lookups fall back to it when the store is unreachable
//! or has no match, and registration checks it so a new record can never
//! collide (case-insensitively) with a sample number.

use crate::certificate::Certificate;
use crate::identity::CertificateNumber;
use chrono::TimeZone;

/// Read-only collection of sample certificates.
#[derive(Debug, Clone)]
pub struct SeedSet {
    records: Vec<Certificate>,
}

impl SeedSet {
    /// The built-in GIE sample certificates.
    pub fn builtin() -> Self {
        Self {
            records: builtin_records(),
        }
    }

    /// An empty seed set, for tests that want the store to be the only
    /// source.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Build a seed set from explicit records.
    pub fn from_records(records: Vec<Certificate>) -> Self {
        Self { records }
    }

    /// Find a seed record by normalized key.
    pub fn get(&self, number: &CertificateNumber) -> Option<&Certificate> {
        self.records
            .iter()
            .find(|c| number.matches_folded(&c.certificate_number))
    }

    /// Whether a seed record matches the normalized key.
    pub fn contains(&self, number: &CertificateNumber) -> bool {
        self.get(number).is_some()
    }

    /// All seed records, in fixed order.
    pub fn records(&self) -> &[Certificate] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SeedSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn seed_timestamp(year: i32, month: u32, day: u32) -> crate::Timestamp {
    // Seed data is fixed; these dates are always valid.
    chrono::Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .unwrap()
}

fn builtin_records() -> Vec<Certificate> {
    vec![
        Certificate {
            id: 1,
            certificate_number: "GIE-2024-001234".to_string(),
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
            issue_date: "2024-01-15".to_string(),
            image_url: None,
            created_at: seed_timestamp(2024, 1, 15),
        },
        Certificate {
            id: 2,
            certificate_number: "GIE-2024-001235".to_string(),
            gemstone_type: "Ruby".to_string(),
            carat_weight: "2.15".to_string(),
            color: "Pigeon Blood Red".to_string(),
            clarity: "VS1".to_string(),
            cut: "Oval".to_string(),
            polish: "Very Good".to_string(),
            symmetry: "Very Good".to_string(),
            fluorescence: "None".to_string(),
            measurements: "8.12 x 6.45 x 4.21 mm".to_string(),
            origin: "Burma (Myanmar)".to_string(),
            issue_date: "2024-01-20".to_string(),
            image_url: None,
            created_at: seed_timestamp(2024, 1, 20),
        },
        Certificate {
            id: 3,
            certificate_number: "GIE-2024-001236".to_string(),
            gemstone_type: "Sapphire".to_string(),
            carat_weight: "3.45".to_string(),
            color: "Royal Blue".to_string(),
            clarity: "VVS2".to_string(),
            cut: "Cushion".to_string(),
            polish: "Excellent".to_string(),
            symmetry: "Very Good".to_string(),
            fluorescence: "None".to_string(),
            measurements: "9.15 x 8.92 x 5.78 mm".to_string(),
            origin: "Kashmir".to_string(),
            issue_date: "2024-02-01".to_string(),
            image_url: None,
            created_at: seed_timestamp(2024, 2, 1),
        },
    ]
}

//! Certificate number identity and normalization
//!
//! Certificate numbers must compare equal regardless of casing. Decoding is
//! not this type's job: the HTTP layer percent-decodes path segments exactly
//! once before they reach the registry, and body-supplied numbers are taken
//! verbatim. The display string is stored byte-for-byte; the folded key
//! exists only for comparison and indexing.

use crate::error::RegistryError;
use serde::{Deserialize, Serialize};

/// A parsed certificate number.
///
/// Holds both the display form (original bytes preserved) and the lowercase
/// normalized key used for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateNumber {
    raw: String,
    normalized: String,
}

impl CertificateNumber {
    /// Parse a certificate number.
    ///
    /// The input is kept verbatim as the display form; only a lowercase
    /// fold is derived for the comparison key. Empty or blank input is a
    /// validation error, not a normalization result.
    pub fn parse(input: &str) -> Result<Self, RegistryError> {
        if input.trim().is_empty() {
            return Err(RegistryError::MissingField {
                field: "certificateNumber".to_string(),
            });
        }

        Ok(Self {
            raw: input.to_string(),
            normalized: input.to_lowercase(),
        })
    }

    /// The display form, bytes preserved. This is what is stored.
    pub fn as_raw(&self) -> &str {
        &self.raw
    }

    /// The case-folded comparison key. Never stored, never returned to
    /// clients.
    pub fn as_key(&self) -> &str {
        &self.normalized
    }

    /// Whether a stored display value matches this number exactly
    /// (byte-for-byte, casing included).
    pub fn matches_exact(&self, stored: &str) -> bool {
        self.raw == stored
    }

    /// Whether a stored display value matches this number under
    /// case-insensitive comparison.
    pub fn matches_folded(&self, stored: &str) -> bool {
        stored.to_lowercase() == self.normalized
    }
}

impl std::fmt::Display for CertificateNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_preserves_display_casing() {
        let number = CertificateNumber::parse("GIE-2024-001234").unwrap();
        assert_eq!(number.as_raw(), "GIE-2024-001234");
        assert_eq!(number.as_key(), "gie-2024-001234");
    }

    #[test]
    fn test_percent_sequences_are_literal_text() {
        // Decoding happened (once) before this type sees the value; a
        // literal percent sequence is part of the number, not an escape.
        let encoded = CertificateNumber::parse("AB%20CD").unwrap();
        assert_eq!(encoded.as_raw(), "AB%20CD");
        assert_eq!(encoded.as_key(), "ab%20cd");

        let spaced = CertificateNumber::parse("AB CD").unwrap();
        assert_ne!(encoded.as_key(), spaced.as_key());
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(matches!(
            CertificateNumber::parse(""),
            Err(RegistryError::MissingField { .. })
        ));
        assert!(matches!(
            CertificateNumber::parse("   "),
            Err(RegistryError::MissingField { .. })
        ));
    }

    #[test]
    fn test_case_variants_share_a_key() {
        let lower = CertificateNumber::parse("gie-2024-009999").unwrap();
        let upper = CertificateNumber::parse("GIE-2024-009999").unwrap();
        assert_eq!(lower.as_key(), upper.as_key());
        assert_ne!(lower.as_raw(), upper.as_raw());
    }

    #[test]
    fn test_matches_exact_and_folded() {
        let number = CertificateNumber::parse("Gie-2024-001234").unwrap();
        assert!(number.matches_exact("Gie-2024-001234"));
        assert!(!number.matches_exact("GIE-2024-001234"));
        assert!(number.matches_folded("GIE-2024-001234"));
        assert!(number.matches_folded("gie-2024-001234"));
        assert!(!number.matches_folded("GIE-2024-001235"));
    }

    proptest! {
        #[test]
        fn prop_key_is_case_insensitive(s in "[A-Za-z0-9-]{1,32}") {
            let original = CertificateNumber::parse(&s).unwrap();
            let upper = CertificateNumber::parse(&s.to_uppercase()).unwrap();
            let lower = CertificateNumber::parse(&s.to_lowercase()).unwrap();
            prop_assert_eq!(original.as_key(), upper.as_key());
            prop_assert_eq!(original.as_key(), lower.as_key());
        }

        #[test]
        fn prop_display_form_is_verbatim(s in "[A-Za-z0-9%_ -]{1,32}") {
            prop_assume!(!s.trim().is_empty());
            let number = CertificateNumber::parse(&s).unwrap();
            prop_assert_eq!(number.as_raw(), s.as_str());
        }
    }
}

//! Certificate record and creation draft
//!
//! Wire format is camelCase to match the registry's public JSON API.

use crate::error::RegistryError;
use crate::{CertificateId, Timestamp};
use serde::{Deserialize, Serialize};

/// A graded gemstone certificate.
///
/// Records are append-only: once created they are never mutated or deleted.
/// `id` and `created_at` are system-assigned, never client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Certificate {
    /// Surrogate key, monotonically increasing with insertion order.
    pub id: CertificateId,
    /// Natural business key; unique case-insensitively across the whole
    /// registry (persistent store and seed set combined). Display casing
    /// is preserved.
    pub certificate_number: String,
    pub gemstone_type: String,
    pub carat_weight: String,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub polish: String,
    pub symmetry: String,
    pub fluorescence: String,
    pub measurements: String,
    pub origin: String,
    /// Issue date as a display string (e.g. "2024-01-15").
    pub issue_date: String,
    /// Reference to an externally stored photo, if any.
    pub image_url: Option<String>,
    /// Server-assigned insert timestamp, monotonic with insertion order.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Client-supplied payload for registering a new certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CertificateDraft {
    pub certificate_number: String,
    pub gemstone_type: String,
    pub carat_weight: String,
    pub color: String,
    pub clarity: String,
    pub cut: String,
    pub polish: String,
    pub symmetry: String,
    pub fluorescence: String,
    pub measurements: String,
    pub origin: String,
    /// Defaults to the current date when omitted.
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CertificateDraft {
    /// Field names in wire (camelCase) form, paired with accessors, in the
    /// order they are validated.
    fn required_fields(&self) -> [(&'static str, &str); 11] {
        [
            ("certificateNumber", &self.certificate_number),
            ("gemstoneType", &self.gemstone_type),
            ("caratWeight", &self.carat_weight),
            ("color", &self.color),
            ("clarity", &self.clarity),
            ("cut", &self.cut),
            ("polish", &self.polish),
            ("symmetry", &self.symmetry),
            ("fluorescence", &self.fluorescence),
            ("measurements", &self.measurements),
            ("origin", &self.origin),
        ]
    }

    /// Validate that every required descriptive field is present and
    /// non-empty. No format constraint is imposed beyond non-emptiness.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (field, value) in self.required_fields() {
            if value.trim().is_empty() {
                return Err(RegistryError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// The issue date to record: the supplied one, or today's date when the
    /// draft omitted it.
    pub fn issue_date_or_today(&self) -> String {
        match &self.issue_date {
            Some(date) if !date.trim().is_empty() => date.clone(),
            _ => chrono::Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for persisted reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Identifier of the resident who filed a report. Immutable once the report
/// is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReporterId(pub String);

/// Identity of the user performing an operation. Passed explicitly into every
/// service call instead of being read from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorId(pub String);

/// Map pin supplied by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Reference to a photo held by the external blob store. The core never
/// touches file bytes, only the keys the store handed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceImage {
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
}

/// Raw submission captured from the report form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub incident_date: NaiveDate,
    pub coordinates: Option<GeoPoint>,
    pub images: Vec<EvidenceImage>,
    /// Optional replacement for the reporter's profile address, applied as a
    /// side effect of a successful submission.
    #[serde(default)]
    pub reporter_address: Option<String>,
}

/// Note and proof photos supplied when staff close out a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionInput {
    pub note: String,
    pub images: Vec<EvidenceImage>,
}

/// Severity tier assigned exactly once at intake and never recomputed.
///
/// Variants are ordered by escalation so triage ordering and alert thresholds
/// can compare tiers directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum UrgencyTier {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyTier {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyTier::Low => "Low",
            UrgencyTier::Medium => "Medium",
            UrgencyTier::High => "High",
            UrgencyTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle stage of a report. Serialized with the legacy wire labels so
/// existing dashboards keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    #[serde(rename = "Proses")]
    InProgress,
    #[serde(rename = "Selesai")]
    Resolved,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "Proses",
            ReportStatus::Resolved => "Selesai",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Resolved)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated, immutable content of a citizen report.
///
/// Coordinates stay optional at the record level because legacy rows predate
/// the mandatory map pin; intake rejects new submissions without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub reporter_id: ReporterId,
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub incident_date: NaiveDate,
    pub coordinates: Option<GeoPoint>,
    pub images: Vec<EvidenceImage>,
    pub urgency: UrgencyTier,
    pub submitted_at: DateTime<Utc>,
}

/// Proof of work recorded when a report is resolved. All three fields are
/// written together during the closing transition and never exist earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub note: String,
    pub images: Vec<EvidenceImage>,
    pub completed_at: DateTime<Utc>,
}

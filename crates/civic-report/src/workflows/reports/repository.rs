use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Report, ReportId, ReportStatus, ReporterId, Resolution};

/// Repository row pairing immutable report content with lifecycle state.
///
/// `resolution` is `Some` exactly when `status` is Selesai; the conditional
/// `transition` contract below keeps the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report: Report,
    pub status: ReportStatus,
    pub resolution: Option<Resolution>,
}

impl ReportRecord {
    /// Sanitized payload returned after mutations.
    pub fn status_view(&self) -> ReportStatusView {
        ReportStatusView {
            report_id: self.report.id.clone(),
            status: self.status.label(),
            urgency: self.report.urgency.label(),
            resolution: self.resolution.as_ref().map(ResolutionView::from),
        }
    }

    /// Full read model for dashboards and map views.
    pub fn detail_view(&self) -> ReportDetailView {
        ReportDetailView {
            report_id: self.report.id.clone(),
            reporter_id: self.report.reporter_id.clone(),
            title: self.report.title.clone(),
            description: self.report.description.clone(),
            location_address: self.report.location_address.clone(),
            incident_date: self.report.incident_date,
            latitude: self.report.coordinates.map(|point| point.latitude),
            longitude: self.report.coordinates.map(|point| point.longitude),
            images: self
                .report
                .images
                .iter()
                .map(|image| image.storage_key.clone())
                .collect(),
            urgency: self.report.urgency.label(),
            status: self.status.label(),
            submitted_at: self.report.submitted_at,
            resolution: self.resolution.as_ref().map(ResolutionView::from),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError>;
    /// Conditionally advance a report: the stored status must equal
    /// `expected` or the call fails with `InvalidState`. Resolution data is
    /// written in the same operation as the status flip, never separately.
    fn transition(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        change: StatusChange,
    ) -> Result<ReportRecord, RepositoryError>;
    /// Open records ordered most urgent first, newest first within a tier.
    fn triage_queue(&self, limit: usize) -> Result<Vec<ReportRecord>, RepositoryError>;
    fn counts(&self) -> Result<StatusCounts, RepositoryError>;
}

/// Mutation applied by a successful status transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusChange {
    /// Move a pending report into processing.
    Begin,
    /// Close out an in-progress report with its proof of work.
    Resolve(Resolution),
}

impl StatusChange {
    pub const fn target(&self) -> ReportStatus {
        match self {
            StatusChange::Begin => ReportStatus::InProgress,
            StatusChange::Resolve(_) => ReportStatus::Resolved,
        }
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("report already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("report is {current}, expected {expected}")]
    InvalidState {
        expected: ReportStatus,
        current: ReportStatus,
    },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Directory of reporter profiles, so submission can apply the optional
/// address update without knowing how user accounts are stored.
pub trait ProfileDirectory: Send + Sync {
    fn update_address(&self, reporter: &ReporterId, address: &str) -> Result<(), ProfileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile directory unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound alert hooks notifying triage staff of notable
/// submissions.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: TriageAlert) -> Result<(), AlertError>;
}

/// Simple alert payload so routes/tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageAlert {
    pub template: String,
    pub report_id: ReportId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Dashboard counters grouped by lifecycle stage. Wire field names match the
/// legacy stats block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    #[serde(rename = "process")]
    pub in_progress: usize,
    #[serde(rename = "completed")]
    pub resolved: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ReportStatus) {
        self.total += 1;
        match status {
            ReportStatus::Pending => self.pending += 1,
            ReportStatus::InProgress => self.in_progress += 1,
            ReportStatus::Resolved => self.resolved += 1,
        }
    }
}

/// Sanitized representation of a report's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatusView {
    pub report_id: ReportId,
    pub status: &'static str,
    pub urgency: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionView>,
}

/// Read model carrying everything the dashboards render for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetailView {
    pub report_id: ReportId,
    pub reporter_id: ReporterId,
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub incident_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub images: Vec<String>,
    pub urgency: &'static str,
    pub status: &'static str,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionView>,
}

/// Resolution fields exposed to callers once a report is Selesai.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionView {
    pub note: String,
    pub images: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl From<&Resolution> for ResolutionView {
    fn from(resolution: &Resolution) -> Self {
        Self {
            note: resolution.note.clone(),
            images: resolution
                .images
                .iter()
                .map(|image| image.storage_key.clone())
                .collect(),
            completed_at: resolution.completed_at,
        }
    }
}

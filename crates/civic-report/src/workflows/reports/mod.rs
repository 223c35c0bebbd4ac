//! Citizen report intake, urgency classification, and lifecycle tracking.
//!
//! The flow mirrors the paper trail of a municipal complaint desk: a resident
//! submits a report with photos and a map pin, the classifier assigns a
//! severity tier from the title and description, and staff walk the report
//! through `Pending -> Proses -> Selesai`, attaching proof of work when they
//! close it. Status moves forward only, and every move is a conditional
//! update so concurrent duplicate actions fail instead of double-applying.

pub mod classifier;
pub mod domain;
pub mod intake;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{ClassifierConfig, UrgencyClassifier, UrgencyLexicon, UrgencyLexiconError};
pub use domain::{
    ActorId, EvidenceImage, GeoPoint, Report, ReportId, ReportStatus, ReportSubmission,
    ReporterId, Resolution, ResolutionInput, UrgencyTier,
};
pub use intake::{IntakeGuard, IntakePolicy, ReportDraft, ValidationError};
pub use lifecycle::ReportTransition;
pub use repository::{
    AlertError, AlertPublisher, ProfileDirectory, ProfileError, ReportDetailView, ReportRecord,
    ReportRepository, ReportStatusView, RepositoryError, ResolutionView, StatusChange,
    StatusCounts, TriageAlert,
};
pub use router::report_router;
pub use service::{ReportService, ReportServiceError};

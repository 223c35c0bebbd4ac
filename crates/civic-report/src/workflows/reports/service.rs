use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::classifier::{ClassifierConfig, UrgencyClassifier};
use super::domain::{
    ActorId, Report, ReportId, ReportStatus, ReportSubmission, ReporterId, ResolutionInput,
    UrgencyTier,
};
use super::intake::{IntakeGuard, IntakePolicy, ValidationError};
use super::lifecycle::ReportTransition;
use super::repository::{
    AlertError, AlertPublisher, ProfileDirectory, ProfileError, ReportRecord, ReportRepository,
    RepositoryError, StatusChange, StatusCounts, TriageAlert,
};

/// Service composing the intake guard, urgency classifier, and repository.
pub struct ReportService<R, P, A> {
    guard: IntakeGuard,
    classifier: UrgencyClassifier,
    repository: Arc<R>,
    profiles: Arc<P>,
    alerts: Arc<A>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

impl<R, P, A> ReportService<R, P, A>
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        profiles: Arc<P>,
        alerts: Arc<A>,
        classifier_config: ClassifierConfig,
        policy: IntakePolicy,
    ) -> Self {
        Self {
            guard: IntakeGuard::with_policy(policy),
            classifier: UrgencyClassifier::new(classifier_config),
            repository,
            profiles,
            alerts,
        }
    }

    /// Submit a new report on behalf of `actor`, returning the stored record.
    ///
    /// Urgency is computed here, once; there is no edit path that would
    /// recompute it later.
    pub fn submit(
        &self,
        actor: &ActorId,
        submission: ReportSubmission,
    ) -> Result<ReportRecord, ReportServiceError> {
        let draft = self.guard.draft_from_submission(submission)?;
        let urgency = self.classifier.classify_report(&draft.title, &draft.description);

        let report = Report {
            id: next_report_id(),
            reporter_id: ReporterId(actor.0.clone()),
            title: draft.title,
            description: draft.description,
            location_address: draft.location_address,
            incident_date: draft.incident_date,
            coordinates: Some(draft.coordinates),
            images: draft.images,
            urgency,
            submitted_at: Utc::now(),
        };

        let record = ReportRecord {
            report,
            status: ReportStatus::Pending,
            resolution: None,
        };
        let stored = self.repository.insert(record)?;

        if let Some(address) = draft.reporter_address {
            self.profiles
                .update_address(&stored.report.reporter_id, &address)?;
        }

        if stored.report.urgency >= UrgencyTier::High {
            let mut details = BTreeMap::new();
            details.insert(
                "urgency".to_string(),
                stored.report.urgency.label().to_string(),
            );
            details.insert("title".to_string(), stored.report.title.clone());
            self.alerts.publish(TriageAlert {
                template: "urgent_report_submitted".to_string(),
                report_id: stored.report.id.clone(),
                details,
            })?;
        }

        info!(
            report_id = %stored.report.id.0,
            actor = %actor.0,
            urgency = stored.report.urgency.label(),
            "report submitted"
        );
        Ok(stored)
    }

    /// Move a pending report into processing.
    pub fn process(
        &self,
        actor: &ActorId,
        report_id: &ReportId,
    ) -> Result<ReportRecord, ReportServiceError> {
        let transition = ReportTransition::Process;
        let record =
            self.repository
                .transition(report_id, transition.expects(), StatusChange::Begin)?;

        info!(report_id = %record.report.id.0, actor = %actor.0, "report moved to processing");
        Ok(record)
    }

    /// Close out an in-progress report with its resolution proof. Note,
    /// images, and timestamp land in storage as a single conditional update.
    pub fn complete(
        &self,
        actor: &ActorId,
        report_id: &ReportId,
        input: ResolutionInput,
    ) -> Result<ReportRecord, ReportServiceError> {
        let resolution = self.guard.resolution_from_input(input, Utc::now())?;
        let transition = ReportTransition::Complete;
        let record = self.repository.transition(
            report_id,
            transition.expects(),
            StatusChange::Resolve(resolution),
        )?;

        info!(report_id = %record.report.id.0, actor = %actor.0, "report resolved");
        Ok(record)
    }

    /// Fetch a report and current status for API responses.
    pub fn get(&self, report_id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        let record = self
            .repository
            .fetch(report_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Records for the staff triage queue, most urgent first.
    pub fn triage_queue(&self, limit: usize) -> Result<Vec<ReportRecord>, ReportServiceError> {
        Ok(self.repository.triage_queue(limit)?)
    }

    /// Dashboard counters grouped by lifecycle stage.
    pub fn counts(&self) -> Result<StatusCounts, ReportServiceError> {
        Ok(self.repository.counts()?)
    }

    /// Expose the pure classifier for callers that only need a tier.
    pub fn classify(&self, text: &str) -> UrgencyTier {
        self.classifier.classify(text)
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Alert(#[from] AlertError),
}

use chrono::NaiveDate;
use civic_report::workflows::reports::{
    AlertError, AlertPublisher, IntakePolicy, ProfileDirectory, ProfileError, ReportId,
    ReportRecord, ReportRepository, ReportStatus, ReporterId, RepositoryError, StatusChange,
    StatusCounts, TriageAlert,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.report.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.report.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn transition(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        change: StatusChange,
    ) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        // Check-and-set: a concurrent duplicate action observes the error
        // instead of double-applying resolution data.
        if record.status != expected {
            return Err(RepositoryError::InvalidState {
                expected,
                current: record.status,
            });
        }

        record.status = change.target();
        if let StatusChange::Resolve(resolution) = change {
            record.resolution = Some(resolution);
        }
        Ok(record.clone())
    }

    fn triage_queue(&self, limit: usize) -> Result<Vec<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ReportRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.report
                .urgency
                .cmp(&a.report.urgency)
                .then(b.report.submitted_at.cmp(&a.report.submitted_at))
        });
        records.truncate(limit);
        Ok(records)
    }

    fn counts(&self) -> Result<StatusCounts, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut counts = StatusCounts::default();
        for record in guard.values() {
            counts.record(record.status);
        }
        Ok(counts)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileDirectory {
    addresses: Arc<Mutex<HashMap<ReporterId, String>>>,
}

impl ProfileDirectory for InMemoryProfileDirectory {
    fn update_address(&self, reporter: &ReporterId, address: &str) -> Result<(), ProfileError> {
        self.addresses
            .lock()
            .expect("profile mutex poisoned")
            .insert(reporter.clone(), address.to_string());
        Ok(())
    }
}

impl InMemoryProfileDirectory {
    pub(crate) fn address_of(&self, reporter: &ReporterId) -> Option<String> {
        self.addresses
            .lock()
            .expect("profile mutex poisoned")
            .get(reporter)
            .cloned()
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<Vec<TriageAlert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: TriageAlert) -> Result<(), AlertError> {
        let mut guard = self.events.lock().expect("alert mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    pub(crate) fn events(&self) -> Vec<TriageAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

// Limits from the original portal: five photos per report, three per
// resolution, 255-character titles.
pub(crate) fn default_intake_policy() -> IntakePolicy {
    IntakePolicy::new(5, 3, 255)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

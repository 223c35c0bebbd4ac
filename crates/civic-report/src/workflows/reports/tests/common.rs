use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::reports::classifier::ClassifierConfig;
use crate::workflows::reports::domain::{
    ActorId, EvidenceImage, GeoPoint, ReportId, ReportSubmission, ReporterId, ResolutionInput,
};
use crate::workflows::reports::intake::IntakePolicy;
use crate::workflows::reports::repository::{
    AlertError, AlertPublisher, ProfileDirectory, ProfileError, ReportRecord, ReportRepository,
    RepositoryError, StatusChange, StatusCounts, TriageAlert,
};
use crate::workflows::reports::{report_router, ReportService};

pub(super) fn reporter() -> ActorId {
    ActorId("warga-17".to_string())
}

pub(super) fn staff() -> ActorId {
    ActorId("petugas-03".to_string())
}

pub(super) fn evidence(file_name: &str) -> EvidenceImage {
    EvidenceImage {
        file_name: file_name.to_string(),
        storage_key: format!("reports/{file_name}"),
        content_type: "image/jpeg".to_string(),
    }
}

pub(super) fn images(count: usize) -> Vec<EvidenceImage> {
    (0..count)
        .map(|index| evidence(&format!("bukti-{index}.jpg")))
        .collect()
}

pub(super) fn submission() -> ReportSubmission {
    ReportSubmission {
        title: "Tumpukan sampah di pasar".to_string(),
        description: "Sampah menumpuk dan belum diangkut selama seminggu".to_string(),
        location_address: "Jl. Merdeka No. 4, Kelurahan Sukamaju".to_string(),
        incident_date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
        coordinates: Some(GeoPoint {
            latitude: -6.914744,
            longitude: 107.609810,
        }),
        images: images(3),
        reporter_address: None,
    }
}

pub(super) fn critical_submission() -> ReportSubmission {
    let mut submission = submission();
    submission.title = "Kebakaran di gudang belakang pasar".to_string();
    submission.description = "Api membesar, warga sudah dievakuasi".to_string();
    submission
}

pub(super) fn resolution_input() -> ResolutionInput {
    ResolutionInput {
        note: "Sampah sudah diangkut dan lokasi dibersihkan".to_string(),
        images: vec![evidence("selesai-1.jpg"), evidence("selesai-2.jpg")],
    }
}

pub(super) type MemoryService = ReportService<MemoryRepository, MemoryProfiles, MemoryAlerts>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryRepository>,
    Arc<MemoryProfiles>,
    Arc<MemoryAlerts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = ReportService::new(
        repository.clone(),
        profiles.clone(),
        alerts.clone(),
        ClassifierConfig::default(),
        IntakePolicy::default(),
    );
    (service, repository, profiles, alerts)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for MemoryRepository {
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
        expected: crate::workflows::reports::ReportStatus,
        change: StatusChange,
    ) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
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
pub(super) struct MemoryProfiles {
    addresses: Arc<Mutex<HashMap<ReporterId, String>>>,
}

impl MemoryProfiles {
    pub(super) fn address_of(&self, reporter: &ReporterId) -> Option<String> {
        self.addresses
            .lock()
            .expect("profile mutex poisoned")
            .get(reporter)
            .cloned()
    }
}

impl ProfileDirectory for MemoryProfiles {
    fn update_address(&self, reporter: &ReporterId, address: &str) -> Result<(), ProfileError> {
        self.addresses
            .lock()
            .expect("profile mutex poisoned")
            .insert(reporter.clone(), address.to_string());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<TriageAlert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<TriageAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: TriageAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn transition(
        &self,
        _id: &ReportId,
        _expected: crate::workflows::reports::ReportStatus,
        _change: StatusChange,
    ) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn triage_queue(&self, _limit: usize) -> Result<Vec<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn counts(&self) -> Result<StatusCounts, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn report_router_with_service(service: MemoryService) -> axum::Router {
    report_router(Arc::new(service))
}

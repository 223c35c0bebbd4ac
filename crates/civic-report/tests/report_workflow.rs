//! Integration specifications for the citizen report intake and lifecycle
//! workflow.
//!
//! Scenarios focus on end-to-end behavior delivered through the public
//! service facade and HTTP router so we can validate classification,
//! lifecycle, and routing without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use civic_report::workflows::reports::{
        ActorId, AlertError, AlertPublisher, ClassifierConfig, EvidenceImage, GeoPoint,
        IntakePolicy, ProfileDirectory, ProfileError, ReportId, ReportRecord, ReportRepository,
        ReportService, ReportStatus, ReportSubmission, ReporterId, RepositoryError,
        ResolutionInput, StatusChange, StatusCounts, TriageAlert,
    };

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

    pub(super) fn submission(title: &str, description: &str) -> ReportSubmission {
        ReportSubmission {
            title: title.to_string(),
            description: description.to_string(),
            location_address: "Jl. Merdeka No. 4, Kelurahan Sukamaju".to_string(),
            incident_date: NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date"),
            coordinates: Some(GeoPoint {
                latitude: -6.914744,
                longitude: 107.609810,
            }),
            images: vec![
                evidence("bukti-1.jpg"),
                evidence("bukti-2.jpg"),
                evidence("bukti-3.jpg"),
            ],
            reporter_address: None,
        }
    }

    pub(super) fn resolution() -> ResolutionInput {
        ResolutionInput {
            note: "diperbaiki".to_string(),
            images: vec![evidence("selesai-1.jpg"), evidence("selesai-2.jpg")],
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryRepository {
        records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
    }

    impl ReportRepository for MemoryRepository {
        fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
            if guard.contains_key(&record.report.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.report.id.clone(), record.clone());
            Ok(record)
        }

        fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
            let guard = self.records.lock().expect("lock");
            Ok(guard.get(id).cloned())
        }

        fn transition(
            &self,
            id: &ReportId,
            expected: ReportStatus,
            change: StatusChange,
        ) -> Result<ReportRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("lock");
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
            let guard = self.records.lock().expect("lock");
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
            let guard = self.records.lock().expect("lock");
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
            self.addresses.lock().expect("lock").get(reporter).cloned()
        }
    }

    impl ProfileDirectory for MemoryProfiles {
        fn update_address(
            &self,
            reporter: &ReporterId,
            address: &str,
        ) -> Result<(), ProfileError> {
            self.addresses
                .lock()
                .expect("lock")
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
            self.events.lock().expect("lock").clone()
        }
    }

    impl AlertPublisher for MemoryAlerts {
        fn publish(&self, alert: TriageAlert) -> Result<(), AlertError> {
            self.events.lock().expect("lock").push(alert);
            Ok(())
        }
    }

    pub(super) fn build_service() -> (
        ReportService<MemoryRepository, MemoryProfiles, MemoryAlerts>,
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
}

mod classification {
    use super::common::*;
    use civic_report::workflows::reports::{ReportRepository, ReportStatus, UrgencyTier};

    #[test]
    fn urgency_is_computed_once_at_intake() {
        let (service, repository, _, _) = build_service();

        let record = service
            .submit(
                &reporter(),
                submission("Kebakaran di gedung sekolah", "Asap terlihat dari jauh"),
            )
            .expect("submission succeeds");

        assert_eq!(record.report.urgency, UrgencyTier::Critical);
        assert_eq!(record.status, ReportStatus::Pending);

        let stored = repository
            .fetch(&record.report.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(stored.report.urgency, UrgencyTier::Critical);
    }

    #[test]
    fn tiers_follow_first_match_precedence() {
        let (service, _, _, _) = build_service();
        assert_eq!(
            service.classify("banjir besar merendam jalan"),
            UrgencyTier::High
        );
        assert_eq!(
            service.classify("jalan rusak dan berlubang"),
            UrgencyTier::Medium
        );
        assert_eq!(
            service.classify("parkir sembarangan di depan rumah"),
            UrgencyTier::Low
        );
        assert_eq!(
            service.classify("banjir setelah kebakaran pabrik"),
            UrgencyTier::Critical
        );
    }
}

mod lifecycle {
    use super::common::*;
    use civic_report::workflows::reports::{
        ReportRepository, ReportServiceError, ReportStatus, RepositoryError,
    };

    #[test]
    fn report_walks_pending_process_resolved() {
        let (service, repository, _, _) = build_service();

        let record = service
            .submit(
                &reporter(),
                submission("Tumpukan sampah di pasar", "Belum diangkut seminggu"),
            )
            .expect("submission succeeds");
        let id = record.report.id.clone();

        let processing = service.process(&staff(), &id).expect("process succeeds");
        assert_eq!(processing.status, ReportStatus::InProgress);

        let resolved = service
            .complete(&staff(), &id, resolution())
            .expect("complete succeeds");
        assert_eq!(resolved.status, ReportStatus::Resolved);

        let stored = repository.fetch(&id).expect("fetch").expect("present");
        let resolution = stored.resolution.expect("resolution populated");
        assert_eq!(resolution.note, "diperbaiki");
        assert_eq!(resolution.images.len(), 2);
    }

    #[test]
    fn out_of_order_actions_are_rejected() {
        let (service, _, _, _) = build_service();

        let record = service
            .submit(
                &reporter(),
                submission("Lampu mati di gang", "Sudah tiga malam gelap"),
            )
            .expect("submission succeeds");
        let id = record.report.id.clone();

        // Straight to complete without processing first.
        match service.complete(&staff(), &id, resolution()) {
            Err(ReportServiceError::Repository(RepositoryError::InvalidState {
                current: ReportStatus::Pending,
                ..
            })) => {}
            other => panic!("expected invalid state, got {other:?}"),
        }
    }

    #[test]
    fn profile_address_update_rides_along_with_submission() {
        let (service, _, profiles, _) = build_service();

        let mut with_address =
            submission("Pohon tumbang dekat sekolah", "Menghalangi trotoar");
        with_address.reporter_address = Some("Jl. Kenanga 12".to_string());

        let record = service
            .submit(&reporter(), with_address)
            .expect("submission succeeds");
        assert_eq!(
            profiles.address_of(&record.report.reporter_id).as_deref(),
            Some("Jl. Kenanga 12")
        );
    }

    #[test]
    fn critical_reports_raise_triage_alerts() {
        let (service, _, _, alerts) = build_service();

        service
            .submit(
                &reporter(),
                submission("Begal di jembatan", "Korban terluka, butuh bantuan"),
            )
            .expect("submission succeeds");

        let events = alerts.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].template, "urgent_report_submitted");
    }
}

mod routing {
    use super::common::*;

    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use civic_report::workflows::reports::report_router;

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request")
    }

    #[tokio::test]
    async fn submit_and_resolve_through_the_router() {
        let (service, _, _, _) = build_service();
        let router = report_router(Arc::new(service));

        let mut body = serde_json::to_value(submission(
            "Jalan rusak di persimpangan",
            "Lubang besar membahayakan pemotor",
        ))
        .expect("serialize submission");
        body["actor_id"] = json!("warga-17");

        let response = router
            .clone()
            .oneshot(post("/api/v1/reports", body))
            .await
            .expect("submit dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = json_body(response).await;
        assert_eq!(payload.get("urgency"), Some(&json!("Medium")));
        let report_id = payload
            .get("report_id")
            .and_then(Value::as_str)
            .expect("report id")
            .to_string();

        let response = router
            .clone()
            .oneshot(post(
                &format!("/api/v1/reports/{report_id}/process"),
                json!({ "actor_id": "petugas-03" }),
            ))
            .await
            .expect("process dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(post(
                &format!("/api/v1/reports/{report_id}/complete"),
                json!({
                    "actor_id": "petugas-03",
                    "note": "diperbaiki",
                    "images": serde_json::to_value(vec![evidence("selesai-1.jpg")])
                        .expect("serialize images"),
                }),
            ))
            .await
            .expect("complete dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload.get("status"), Some(&json!("Selesai")));
        assert!(payload.get("resolution").is_some());
    }

    #[tokio::test]
    async fn stats_reflect_the_queue() {
        let (service, _, _, _) = build_service();
        let router = report_router(Arc::new(service));

        let mut body = serde_json::to_value(submission(
            "Sampah menumpuk",
            "Di depan balai warga",
        ))
        .expect("serialize submission");
        body["actor_id"] = json!("warga-17");
        router
            .clone()
            .oneshot(post("/api/v1/reports", body))
            .await
            .expect("submit dispatch");

        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/reports/stats")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("stats dispatch");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload.get("total"), Some(&json!(1)));
        assert_eq!(payload.get("pending"), Some(&json!(1)));
    }
}

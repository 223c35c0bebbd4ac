use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ActorId, EvidenceImage, ReportId, ReportSubmission, ResolutionInput};
use super::repository::{AlertPublisher, ProfileDirectory, ReportRepository, RepositoryError};
use super::service::{ReportService, ReportServiceError};

/// Router builder exposing HTTP endpoints for intake and triage.
pub fn report_router<R, P, A>(service: Arc<ReportService<R, P, A>>) -> Router
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/reports",
            post(submit_handler::<R, P, A>).get(queue_handler::<R, P, A>),
        )
        .route("/api/v1/reports/stats", get(stats_handler::<R, P, A>))
        .route("/api/v1/reports/:report_id", get(detail_handler::<R, P, A>))
        .route(
            "/api/v1/reports/:report_id/process",
            post(process_handler::<R, P, A>),
        )
        .route(
            "/api/v1/reports/:report_id/complete",
            post(complete_handler::<R, P, A>),
        )
        .with_state(service)
}

/// Submission payload: the acting user plus the report form fields.
#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub actor_id: String,
    #[serde(flatten)]
    pub submission: ReportSubmission,
}

#[derive(Debug, Deserialize)]
pub struct ProcessReportRequest {
    pub actor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteReportRequest {
    pub actor_id: String,
    pub note: String,
    pub images: Vec<EvidenceImage>,
}

#[derive(Debug, Deserialize)]
pub struct QueueParams {
    #[serde(default = "default_queue_limit")]
    pub limit: usize,
}

fn default_queue_limit() -> usize {
    50
}

pub(crate) async fn submit_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
    axum::Json(payload): axum::Json<SubmitReportRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    let actor = ActorId(payload.actor_id);
    match service.submit(&actor, payload.submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn queue_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
    Query(params): Query<QueueParams>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    match service.triage_queue(params.limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.detail_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn stats_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    match service.counts() {
        Ok(counts) => (StatusCode::OK, axum::Json(counts)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn detail_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
    Path(report_id): Path<String>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    let id = ReportId(report_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.detail_view())).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn process_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
    Path(report_id): Path<String>,
    axum::Json(payload): axum::Json<ProcessReportRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    let id = ReportId(report_id);
    let actor = ActorId(payload.actor_id);
    match service.process(&actor, &id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn complete_handler<R, P, A>(
    State(service): State<Arc<ReportService<R, P, A>>>,
    Path(report_id): Path<String>,
    axum::Json(payload): axum::Json<CompleteReportRequest>,
) -> Response
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    let id = ReportId(report_id);
    let actor = ActorId(payload.actor_id);
    let input = ResolutionInput {
        note: payload.note,
        images: payload.images,
    };
    match service.complete(&actor, &id, input) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(&error),
    }
}

fn error_response(error: &ReportServiceError) -> Response {
    let (status, payload) = match error {
        ReportServiceError::Validation(validation) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": validation.to_string() }),
        ),
        ReportServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "report not found" }),
        ),
        ReportServiceError::Repository(RepositoryError::InvalidState { expected, current }) => (
            StatusCode::CONFLICT,
            json!({
                "error": error.to_string(),
                "expected": expected.label(),
                "current": current.label(),
            }),
        ),
        ReportServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "report already exists" }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": other.to_string() }),
        ),
    };

    (status, axum::Json(payload)).into_response()
}

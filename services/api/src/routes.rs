use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use civic_report::error::AppError;
use civic_report::workflows::reports::{
    report_router, AlertPublisher, ClassifierConfig, ProfileDirectory, ReportRepository,
    ReportService, UrgencyClassifier, UrgencyLexicon,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

pub(crate) fn with_report_routes<R, P, A>(service: Arc<ReportService<R, P, A>>) -> axum::Router
where
    R: ReportRepository + 'static,
    P: ProfileDirectory + 'static,
    A: AlertPublisher + 'static,
{
    report_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/urgency/classify",
            axum::routing::post(classify_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassifyRequest {
    pub(crate) text: String,
    /// Optional inline `tier,term` CSV replacing the built-in keyword sets
    /// for this one call.
    #[serde(default)]
    pub(crate) lexicon_csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassifyResponse {
    pub(crate) text: String,
    pub(crate) urgency: &'static str,
}

pub(crate) async fn classify_endpoint(
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let ClassifyRequest { text, lexicon_csv } = payload;

    let config = match lexicon_csv {
        Some(csv) => UrgencyLexicon::from_reader(Cursor::new(csv.into_bytes()))?,
        None => ClassifierConfig::default(),
    };
    let classifier = UrgencyClassifier::new(config);
    let urgency = classifier.classify(&text).label();

    Ok(Json(ClassifyResponse { text, urgency }))
}

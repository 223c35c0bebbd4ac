use crate::cli::ServeArgs;
use crate::infra::{
    default_intake_policy, AppState, InMemoryAlertPublisher, InMemoryProfileDirectory,
    InMemoryReportRepository,
};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use civic_report::config::AppConfig;
use civic_report::error::AppError;
use civic_report::telemetry;
use civic_report::workflows::reports::{ClassifierConfig, ReportService, UrgencyLexicon};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let classifier_config = match &config.urgency_lexicon {
        Some(path) => UrgencyLexicon::from_path(path)?,
        None => ClassifierConfig::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryReportRepository::default());
    let profiles = Arc::new(InMemoryProfileDirectory::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let report_service = Arc::new(ReportService::new(
        repository,
        profiles,
        alerts,
        classifier_config,
        default_intake_policy(),
    ));

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "citizen report service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use crate::infra::{
    default_intake_policy, InMemoryAlertPublisher, InMemoryProfileDirectory,
    InMemoryReportRepository,
};
use chrono::{Local, NaiveDate};
use civic_report::error::AppError;
use civic_report::workflows::reports::{
    ActorId, ClassifierConfig, EvidenceImage, GeoPoint, ReportService, ReportSubmission,
    ResolutionInput, UrgencyClassifier, UrgencyLexicon,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Text to classify, e.g. "banjir besar merendam jalan"
    pub(crate) text: String,
    /// Optional `tier,term` CSV lexicon replacing the built-in keyword sets
    #[arg(long)]
    pub(crate) lexicon: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Incident date for the sample report (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) incident_date: Option<NaiveDate>,
    /// Optional `tier,term` CSV lexicon replacing the built-in keyword sets
    #[arg(long)]
    pub(crate) lexicon: Option<PathBuf>,
    /// Stop after submission instead of walking the full lifecycle
    #[arg(long)]
    pub(crate) skip_resolution: bool,
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = load_classifier_config(args.lexicon)?;
    let classifier = UrgencyClassifier::new(config);
    println!("{}", classifier.classify(&args.text).label());
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        incident_date,
        lexicon,
        skip_resolution,
    } = args;

    let incident_date = incident_date.unwrap_or_else(|| Local::now().date_naive());
    let classifier_config = load_classifier_config(lexicon)?;

    println!("Citizen report lifecycle demo");

    let repository = Arc::new(InMemoryReportRepository::default());
    let profiles = Arc::new(InMemoryProfileDirectory::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let service = Arc::new(ReportService::new(
        repository.clone(),
        profiles.clone(),
        alerts.clone(),
        classifier_config,
        default_intake_policy(),
    ));

    let reporter = ActorId("warga-17".to_string());
    let staff = ActorId("petugas-03".to_string());

    let record = match service.submit(&reporter, demo_submission(incident_date)) {
        Ok(record) => record,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    let view = record.status_view();
    println!(
        "- Received report {} -> status {} (urgency {})",
        view.report_id.0, view.status, view.urgency
    );
    if let Some(address) = profiles.address_of(&record.report.reporter_id) {
        println!("  Reporter profile address updated to: {address}");
    }

    let triage_alerts = alerts.events();
    if triage_alerts.is_empty() {
        println!("  Triage alerts: none dispatched");
    } else {
        for alert in &triage_alerts {
            println!(
                "  Triage alert: template={} -> {}",
                alert.template, alert.report_id.0
            );
        }
    }

    if skip_resolution {
        render_counts(&service);
        return Ok(());
    }

    let record = match service.process(&staff, &record.report.id) {
        Ok(record) => record,
        Err(err) => {
            println!("  Processing failed: {err}");
            return Ok(());
        }
    };
    println!("- Staff picked it up -> status {}", record.status.label());

    let record = match service.complete(&staff, &record.report.id, demo_resolution()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Completion failed: {err}");
            return Ok(());
        }
    };
    println!("- Work finished -> status {}", record.status.label());
    if let Some(resolution) = &record.resolution {
        println!("  Resolution note: {}", resolution.note);
        println!(
            "  Proof photos: {} (completed at {})",
            resolution.images.len(),
            resolution.completed_at.format("%Y-%m-%d %H:%M")
        );
    }

    match serde_json::to_string_pretty(&record.status_view()) {
        Ok(json) => println!("  Public status payload:\n{json}"),
        Err(err) => println!("  Public status payload unavailable: {err}"),
    }

    render_counts(&service);
    Ok(())
}

fn render_counts(
    service: &ReportService<
        InMemoryReportRepository,
        InMemoryProfileDirectory,
        InMemoryAlertPublisher,
    >,
) {
    match service.counts() {
        Ok(counts) => println!(
            "\nQueue counters: {} total | {} pending | {} in process | {} completed",
            counts.total, counts.pending, counts.in_progress, counts.resolved
        ),
        Err(err) => println!("\nQueue counters unavailable: {err}"),
    }
}

fn load_classifier_config(lexicon: Option<PathBuf>) -> Result<ClassifierConfig, AppError> {
    match lexicon {
        Some(path) => Ok(UrgencyLexicon::from_path(path)?),
        None => Ok(ClassifierConfig::default()),
    }
}

fn demo_submission(incident_date: NaiveDate) -> ReportSubmission {
    ReportSubmission {
        title: "Kebakaran kecil di pasar induk".to_string(),
        description: "Api muncul dari lapak sayur, warga sudah memanggil damkar".to_string(),
        location_address: "Pasar Induk Blok C, Jl. Merdeka".to_string(),
        incident_date,
        coordinates: Some(GeoPoint {
            latitude: -6.914744,
            longitude: 107.609810,
        }),
        images: vec![demo_evidence("lokasi-1.jpg"), demo_evidence("lokasi-2.png")],
        reporter_address: Some("Jl. Kenanga 12".to_string()),
    }
}

fn demo_resolution() -> ResolutionInput {
    ResolutionInput {
        note: "Api sudah dipadamkan dan lokasi dibersihkan".to_string(),
        images: vec![
            demo_evidence("selesai-1.jpg"),
            demo_evidence("selesai-2.jpg"),
        ],
    }
}

fn demo_evidence(file_name: &str) -> EvidenceImage {
    EvidenceImage {
        file_name: file_name.to_string(),
        storage_key: format!("reports/demo/{file_name}"),
        content_type: mime_guess::from_path(file_name)
            .first_or_octet_stream()
            .to_string(),
    }
}

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{EvidenceImage, GeoPoint, ReportSubmission, Resolution, ResolutionInput};

/// Validation errors raised by the intake guard.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("report title must not be empty")]
    MissingTitle,
    #[error("report title exceeds {limit} characters")]
    TitleTooLong { limit: usize },
    #[error("report description must not be empty")]
    MissingDescription,
    #[error("location address must not be empty")]
    MissingLocationAddress,
    #[error("a map pin (latitude and longitude) is required")]
    MissingGeolocation,
    #[error("coordinates ({latitude}, {longitude}) are out of range")]
    GeolocationOutOfRange { latitude: f64, longitude: f64 },
    #[error("at least one evidence image is required")]
    MissingEvidence,
    #[error("too many evidence images (limit {limit})")]
    TooManyEvidenceImages { limit: usize },
    #[error("evidence image '{file_name}' has no storage key")]
    MissingStorageKey { file_name: String },
    #[error("unsupported image content type '{found}'")]
    UnsupportedImageType { found: String },
    #[error("resolution note must not be empty")]
    MissingResolutionNote,
    #[error("at least one resolution image is required")]
    MissingResolutionEvidence,
    #[error("too many resolution images (limit {limit})")]
    TooManyResolutionImages { limit: usize },
}

const DEFAULT_MAX_REPORT_IMAGES: usize = 5;
const DEFAULT_MAX_RESOLUTION_IMAGES: usize = 3;
const DEFAULT_MAX_TITLE_LENGTH: usize = 255;

/// Policy dials backing intake validation (evidence caps, title length).
#[derive(Debug, Clone)]
pub struct IntakePolicy {
    max_report_images: usize,
    max_resolution_images: usize,
    max_title_length: usize,
}

impl IntakePolicy {
    pub fn new(
        max_report_images: usize,
        max_resolution_images: usize,
        max_title_length: usize,
    ) -> Self {
        Self {
            max_report_images: sanitize(max_report_images, DEFAULT_MAX_REPORT_IMAGES),
            max_resolution_images: sanitize(max_resolution_images, DEFAULT_MAX_RESOLUTION_IMAGES),
            max_title_length: sanitize(max_title_length, DEFAULT_MAX_TITLE_LENGTH),
        }
    }

    pub fn max_report_images(&self) -> usize {
        self.max_report_images
    }

    pub fn max_resolution_images(&self) -> usize {
        self.max_resolution_images
    }

    pub fn max_title_length(&self) -> usize {
        self.max_title_length
    }
}

fn sanitize(value: usize, fallback: usize) -> usize {
    if value == 0 {
        fallback
    } else {
        value
    }
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_REPORT_IMAGES,
            DEFAULT_MAX_RESOLUTION_IMAGES,
            DEFAULT_MAX_TITLE_LENGTH,
        )
    }
}

/// Sanitized submission produced by the guard, ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub location_address: String,
    pub incident_date: NaiveDate,
    pub coordinates: GeoPoint,
    pub images: Vec<EvidenceImage>,
    pub reporter_address: Option<String>,
}

/// Guard validating inbound submissions and resolution payloads.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard {
    policy: IntakePolicy,
}

impl IntakeGuard {
    pub fn with_policy(policy: IntakePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &IntakePolicy {
        &self.policy
    }

    /// Convert an inbound submission into a sanitized draft, rejecting it on
    /// the first violated rule.
    pub fn draft_from_submission(
        &self,
        submission: ReportSubmission,
    ) -> Result<ReportDraft, ValidationError> {
        let title = submission.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        if title.chars().count() > self.policy.max_title_length {
            return Err(ValidationError::TitleTooLong {
                limit: self.policy.max_title_length,
            });
        }

        let description = submission.description.trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::MissingDescription);
        }

        let location_address = submission.location_address.trim().to_string();
        if location_address.is_empty() {
            return Err(ValidationError::MissingLocationAddress);
        }

        let coordinates = submission
            .coordinates
            .ok_or(ValidationError::MissingGeolocation)?;
        if !coordinates.in_range() {
            return Err(ValidationError::GeolocationOutOfRange {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
            });
        }

        if submission.images.is_empty() {
            return Err(ValidationError::MissingEvidence);
        }
        if submission.images.len() > self.policy.max_report_images {
            return Err(ValidationError::TooManyEvidenceImages {
                limit: self.policy.max_report_images,
            });
        }
        for image in &submission.images {
            check_image(image)?;
        }

        let reporter_address = submission
            .reporter_address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty());

        Ok(ReportDraft {
            title,
            description,
            location_address,
            incident_date: submission.incident_date,
            coordinates,
            images: submission.images,
            reporter_address,
        })
    }

    /// Validate a resolution payload and stamp it, so note, images, and
    /// timestamp can be written as one unit.
    pub fn resolution_from_input(
        &self,
        input: ResolutionInput,
        completed_at: DateTime<Utc>,
    ) -> Result<Resolution, ValidationError> {
        let note = input.note.trim().to_string();
        if note.is_empty() {
            return Err(ValidationError::MissingResolutionNote);
        }

        if input.images.is_empty() {
            return Err(ValidationError::MissingResolutionEvidence);
        }
        if input.images.len() > self.policy.max_resolution_images {
            return Err(ValidationError::TooManyResolutionImages {
                limit: self.policy.max_resolution_images,
            });
        }
        for image in &input.images {
            check_image(image)?;
        }

        Ok(Resolution {
            note,
            images: input.images,
            completed_at,
        })
    }
}

fn check_image(image: &EvidenceImage) -> Result<(), ValidationError> {
    if image.storage_key.trim().is_empty() {
        return Err(ValidationError::MissingStorageKey {
            file_name: image.file_name.clone(),
        });
    }
    if !supported_image_type(&image.content_type) {
        return Err(ValidationError::UnsupportedImageType {
            found: image.content_type.clone(),
        });
    }
    Ok(())
}

// Uploads are restricted to the photo formats the portal accepts.
fn supported_image_type(content_type: &str) -> bool {
    match content_type.parse::<mime::Mime>() {
        Ok(parsed) => {
            parsed.type_() == mime::IMAGE
                && matches!(parsed.subtype().as_str(), "jpeg" | "jpg" | "png")
        }
        Err(_) => false,
    }
}

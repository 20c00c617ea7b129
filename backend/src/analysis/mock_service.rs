use std::time::Duration;

use async_trait::async_trait;
use log::info;
use shared::{AnalysisResponse, GenerationParams};

use super::service::{AnalysisRequest, ImageAnalysisService};
use super::validation::ValidatedImage;
use crate::error::AnalysisError;
use crate::upload::AnalysisForm;

pub const MOCK_FINDINGS: &str = "The lungs are clear without focal consolidation, pneumothorax, or pleural effusion. The cardiomediastinal silhouette is normal. The visualized osseous structures are intact.";
pub const MOCK_IMPRESSION: &str = "No acute cardiopulmonary process.";
pub const MOCK_RECOMMENDATION: &str = "Follow-up imaging in 6 months is recommended.";

/// Returns a canned report after a fixed delay, without calling any model.
#[derive(Clone)]
pub struct MockAnalysisService {
    delay: Duration,
}

impl MockAnalysisService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn canned_response() -> AnalysisResponse {
        AnalysisResponse {
            findings: MOCK_FINDINGS.to_string(),
            impression: MOCK_IMPRESSION.to_string(),
            recommendation: MOCK_RECOMMENDATION.to_string(),
        }
    }
}

#[async_trait]
impl ImageAnalysisService for MockAnalysisService {
    fn prepare(&self, form: AnalysisForm) -> Result<AnalysisRequest, AnalysisError> {
        let Some(image) = form.image else {
            return Err(AnalysisError::Validation(
                "No image part in the request".into(),
            ));
        };
        let Some(filename) = image.filename else {
            return Err(AnalysisError::Validation(
                "No image part in the request".into(),
            ));
        };
        if filename.is_empty() {
            return Err(AnalysisError::Validation("No selected file".into()));
        }

        Ok(AnalysisRequest {
            image: ValidatedImage {
                filename,
                content_type: image.content_type.unwrap_or_default(),
                bytes: image.bytes,
            },
            params: GenerationParams::default(),
        })
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        info!(
            "Simulating analysis of {} ({} bytes) for {:?}",
            request.image.filename,
            request.image.bytes.len(),
            self.delay
        );
        tokio::time::sleep(self.delay).await;
        Ok(Self::canned_response())
    }

    fn error_field(&self) -> &'static str {
        "error"
    }
}

use async_trait::async_trait;
use shared::{AnalysisResponse, GenerationParams};

use super::validation::ValidatedImage;
use crate::error::AnalysisError;
use crate::upload::{AnalysisForm, UploadLimits};

/// A validated analysis request, ready to hand to a service.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image: ValidatedImage,
    pub params: GenerationParams,
}

/// Backend behind `POST /api/analyze`.
///
/// The live proxy and the mock deployable both implement this, so the endpoint
/// wiring in `routes` is shared.
#[async_trait]
pub trait ImageAnalysisService: Send + Sync {
    /// Checks the uploaded form and turns it into a request.
    fn prepare(&self, form: AnalysisForm) -> Result<AnalysisRequest, AnalysisError>;

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;

    /// Size ceilings enforced while the multipart body is read.
    fn upload_limits(&self) -> UploadLimits {
        UploadLimits::default()
    }

    /// JSON key that carries the message in error bodies.
    fn error_field(&self) -> &'static str {
        "detail"
    }
}

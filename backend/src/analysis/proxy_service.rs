use async_trait::async_trait;
use log::error;
use shared::AnalysisResponse;

use super::params::parse_generation_params;
use super::service::{AnalysisRequest, ImageAnalysisService};
use super::validation::validate_image;
use crate::error::AnalysisError;
use crate::model_api::client::{ForwardError, ModelApiClient};
use crate::upload::{AnalysisForm, UploadLimits};

/// Forwards each analysis to the external model API.
#[derive(Clone)]
pub struct ProxyAnalysisService {
    model_api: ModelApiClient,
    max_image_bytes: usize,
}

impl ProxyAnalysisService {
    pub fn new(model_api: ModelApiClient, max_image_bytes: usize) -> Self {
        Self {
            model_api,
            max_image_bytes,
        }
    }
}

#[async_trait]
impl ImageAnalysisService for ProxyAnalysisService {
    fn prepare(&self, form: AnalysisForm) -> Result<AnalysisRequest, AnalysisError> {
        let image = validate_image(form.image, self.max_image_bytes)?;
        let params = parse_generation_params(&form.fields)?;
        Ok(AnalysisRequest { image, params })
    }

    fn upload_limits(&self) -> UploadLimits {
        UploadLimits {
            max_image_bytes: self.max_image_bytes,
            ..UploadLimits::default()
        }
    }

    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        match self.model_api.generate_report(request).await {
            Ok(report) => Ok(AnalysisResponse::from_report(report)),
            Err(e) => {
                let region = self.model_api.region();
                match &e {
                    ForwardError::Upstream(cause) => error!(
                        "[{}] Error communicating with external model API: {}",
                        region, cause
                    ),
                    ForwardError::Internal(cause) => {
                        error!("[{}] Unexpected error in proxy endpoint: {}", region, cause)
                    }
                }
                Err(e.into())
            }
        }
    }
}

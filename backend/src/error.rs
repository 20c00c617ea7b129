use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::{Map, Value};

use crate::model_api::client::ForwardError;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Internal(String),
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::Validation(_) => StatusCode::BAD_REQUEST,
            AnalysisError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders `{"<field>": "<message>"}` with the matching status code.
    pub fn to_response(&self, field: &str) -> HttpResponse {
        let mut body = Map::new();
        body.insert(field.to_string(), Value::String(self.to_string()));
        HttpResponse::build(self.status_code()).json(Value::Object(body))
    }
}

impl From<ForwardError> for AnalysisError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::Upstream(_) => AnalysisError::Upstream(err.to_string()),
            ForwardError::Internal(_) => AnalysisError::Internal(err.to_string()),
        }
    }
}

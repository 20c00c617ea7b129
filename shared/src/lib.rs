use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_NEW_TOKENS: i64 = 100;
pub const DEFAULT_NUM_BEAMS: i64 = 4;

/// Report generation settings passed through to the model API.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationParams {
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: i64,
    #[serde(default = "default_num_beams")]
    pub num_beams: i64,
    #[serde(default)]
    pub do_sample: bool,
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub top_p: Option<f64>,
}

fn default_max_new_tokens() -> i64 {
    DEFAULT_MAX_NEW_TOKENS
}

fn default_num_beams() -> i64 {
    DEFAULT_NUM_BEAMS
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            prompt_text: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            num_beams: DEFAULT_NUM_BEAMS,
            do_sample: false,
            top_k: None,
            top_p: None,
        }
    }
}

/// Body returned to the frontend by `POST /api/analyze`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub findings: String,
    #[serde(default)]
    pub impression: String,
    #[serde(default)]
    pub recommendation: String,
}

impl AnalysisResponse {
    /// A response carrying only the downstream report text.
    pub fn from_report(report: String) -> Self {
        Self {
            findings: report,
            impression: String::new(),
            recommendation: String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Ok,
    Warning,
    Error,
}

/// Body returned by `GET /api/health`.
///
/// Exactly one of the `external_model_*` pair or `error` is present.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthReport {
    pub status: HealthState,
    pub proxy_ready: bool,
    pub external_model_api_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_model_loaded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_model_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn ok(api_status: String, model_loaded: bool, device: String) -> Self {
        Self {
            status: HealthState::Ok,
            proxy_ready: true,
            external_model_api_status: api_status,
            external_model_loaded: Some(model_loaded),
            external_model_device: Some(device),
            error: None,
        }
    }

    pub fn unreachable(error: String) -> Self {
        Self {
            status: HealthState::Warning,
            proxy_ready: true,
            external_model_api_status: "unreachable".into(),
            external_model_loaded: None,
            external_model_device: None,
            error: Some(error),
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: HealthState::Error,
            proxy_ready: true,
            external_model_api_status: "health check failed".into(),
            external_model_loaded: None,
            external_model_device: None,
            error: Some(error),
        }
    }
}

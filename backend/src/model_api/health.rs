use log::warn;
use serde_json::Value;
use shared::HealthReport;

use super::client::{HealthCheckError, ModelApiClient};

/// The subset of the model API's `/health` body the proxy reports on.
#[derive(Debug, Clone, PartialEq)]
pub struct DownstreamHealth {
    pub status: Option<String>,
    pub model_loaded: Option<bool>,
    pub device: Option<String>,
}

impl DownstreamHealth {
    /// Only a body that is not a JSON object is an error. Fields of an
    /// unexpected type are read leniently: non-string `status`/`device`
    /// values are reported as their JSON text, a non-boolean
    /// `model_loaded` is treated as absent.
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| format!("Invalid health response from model API: {}", e))?;
        let Some(object) = value.as_object() else {
            return Err(format!(
                "Invalid health response from model API: expected a JSON object, got {}",
                value
            ));
        };

        Ok(Self {
            status: object.get("status").and_then(text_of),
            model_loaded: object.get("model_loaded").and_then(Value::as_bool),
            device: object.get("device").and_then(text_of),
        })
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Checks the model API and folds the outcome into the proxy's health body.
/// Never fails; problems are described in the report instead.
pub async fn aggregate_health(client: &ModelApiClient) -> HealthReport {
    match client.fetch_health().await {
        Ok(downstream) => HealthReport::ok(
            downstream.status.unwrap_or_else(|| "unknown".to_string()),
            downstream.model_loaded.unwrap_or(false),
            downstream.device.unwrap_or_else(|| "unknown".to_string()),
        ),
        Err(HealthCheckError::Unreachable(e)) => {
            warn!("[{}] Model API health request failed: {}", client.region(), e);
            HealthReport::unreachable(e)
        }
        Err(HealthCheckError::Failed(e)) => {
            warn!("[{}] Model API health check failed: {}", client.region(), e);
            HealthReport::failed(e)
        }
    }
}

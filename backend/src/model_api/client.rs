use std::time::Duration;

use log::info;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use super::form::report_form_fields;
use super::health::DownstreamHealth;
use crate::analysis::service::AnalysisRequest;
use crate::config::ProxyConfig;

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error(
        "Failed to get response from model API: {0}. Please check the external API's status and logs."
    )]
    Upstream(String),
    #[error("Internal server error in proxy: {0}. Please check proxy logs.")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum HealthCheckError {
    /// Connection failure, timeout or a non-2xx status.
    #[error("{0}")]
    Unreachable(String),
    /// The model API answered but the body could not be understood.
    #[error("{0}")]
    Failed(String),
}

/// HTTP client for the external model API.
#[derive(Clone)]
pub struct ModelApiClient {
    client: reqwest::Client,
    base_url: String,
    forward_timeout: Duration,
    health_timeout: Duration,
    region: String,
}

impl ModelApiClient {
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("xray-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.model_api_base_url.clone(),
            forward_timeout: config.forward_timeout,
            health_timeout: config.health_timeout,
            region: config.region.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sends one `POST /generate_report` and returns the plain-text report.
    /// There is no retry; the first failure is returned.
    pub async fn generate_report(&self, request: AnalysisRequest) -> Result<String, ForwardError> {
        let url = format!("{}/generate_report", self.base_url);
        info!(
            "[{}] Forwarding request to external model API: {}",
            self.region, url
        );

        // Uploads reach here with a content type that `mime` already parsed, so
        // this only fails for requests built outside the analyze endpoint.
        let file_part = Part::bytes(request.image.bytes)
            .file_name(request.image.filename)
            .mime_str(&request.image.content_type)
            .map_err(|e| ForwardError::Internal(format!("Failed to build image part: {}", e)))?;

        let form = report_form_fields(&request.params)
            .into_iter()
            .fold(Form::new().part("file", file_part), |form, (name, value)| {
                form.text(name, value)
            });

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(self.forward_timeout)
            .send()
            .await
            .map_err(|e| ForwardError::Upstream(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::Upstream(describe_status(status, &url, &body)));
        }

        let report = response
            .text()
            .await
            .map_err(|e| ForwardError::Upstream(error_chain(&e)))?;
        info!(
            "[{}] Received report from external API (length: {} chars).",
            self.region,
            report.chars().count()
        );
        Ok(report)
    }

    /// `GET /health` with the short health timeout.
    pub async fn fetch_health(&self) -> Result<DownstreamHealth, HealthCheckError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| HealthCheckError::Unreachable(error_chain(&e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HealthCheckError::Unreachable(describe_status(status, &url, &body)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HealthCheckError::Unreachable(error_chain(&e)))?;
        DownstreamHealth::from_body(&body).map_err(HealthCheckError::Failed)
    }
}

/// The error's message followed by each of its sources, e.g.
/// `error sending request ...: client error (Connect): tcp connect error: Connection refused`.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn describe_status(status: StatusCode, url: &str, body: &str) -> String {
    let kind = if status.is_client_error() {
        "Client Error"
    } else {
        "Server Error"
    };
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let body = body.trim();

    if body.is_empty() {
        format!("{} {}: {} for url: {}", code, kind, reason, url)
    } else {
        let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{} {}: {} for url: {} ({})", code, kind, reason, url, snippet)
    }
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{test, web};
use xray_proxy::analysis::mock_service::MockAnalysisService;
use xray_proxy::analysis::proxy_service::ProxyAnalysisService;
use xray_proxy::analysis::service::ImageAnalysisService;
use xray_proxy::config::ProxyConfig;
use xray_proxy::model_api::client::ModelApiClient;

pub const BOUNDARY: &str = "xray-test-boundary-7MA4YWxkTrZu0gW";

// ASCII so wiremock's body string matchers can read forwarded requests.
pub const PNG_BYTES: &[u8] = b"PNG-TEST-IMAGE-DATA";

/// Hand-built `multipart/form-data` body for driving the analyze endpoint.
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self { body: Vec::new() }
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn image(self, filename: &str) -> Self {
        self.file("image", filename, "image/png", PNG_BYTES)
    }

    pub fn into_request(mut self, uri: &str) -> test::TestRequest {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(self.body)
    }
}

pub fn proxy_config(base_url: &str, overrides: &[(&str, &str)]) -> ProxyConfig {
    let mut vars: HashMap<String, String> = HashMap::from([(
        "MODEL_API_BASE_URL".to_string(),
        base_url.to_string(),
    )]);
    for (name, value) in overrides {
        vars.insert(name.to_string(), value.to_string());
    }
    ProxyConfig::from_lookup(move |name| vars.get(name).cloned()).expect("valid test config")
}

/// App data for the live proxy: the analysis service and the model API client.
pub fn proxy_data(
    config: &ProxyConfig,
) -> (web::Data<dyn ImageAnalysisService>, web::Data<ModelApiClient>) {
    let model_api = ModelApiClient::new(config).expect("client builds");
    let service: Arc<dyn ImageAnalysisService> = Arc::new(ProxyAnalysisService::new(
        model_api.clone(),
        config.max_image_bytes,
    ));
    (web::Data::from(service), web::Data::new(model_api))
}

pub fn mock_data(delay: std::time::Duration) -> web::Data<dyn ImageAnalysisService> {
    let service: Arc<dyn ImageAnalysisService> = Arc::new(MockAnalysisService::new(delay));
    web::Data::from(service)
}

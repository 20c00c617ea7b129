use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::warn;
use serde_json::json;
use shared::AnalysisResponse;

use crate::analysis::service::ImageAnalysisService;
use crate::error::AnalysisError;
use crate::model_api::client::ModelApiClient;
use crate::model_api::health::aggregate_health;
use crate::upload::read_analysis_form;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Medical X-ray Analysis Proxy API! This forwards requests to the main model API.";

/// `POST /api/analyze`, served by whichever `ImageAnalysisService` is registered.
pub fn configure_analysis_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/analyze").route(web::post().to(analyze)));
}

/// The live proxy surface: analysis plus health and the welcome root.
pub fn configure_proxy_routes(cfg: &mut web::ServiceConfig) {
    configure_analysis_routes(cfg);
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)))
        .service(web::resource("/").route(web::get().to(root)));
}

async fn analyze(
    service: web::Data<dyn ImageAnalysisService>,
    query: web::Query<HashMap<String, String>>,
    payload: Multipart,
) -> HttpResponse {
    let service = service.get_ref();

    match run_analysis(service, query.into_inner(), payload).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            // upstream and internal failures are logged by the service
            if let AnalysisError::Validation(reason) = &e {
                warn!("Rejected analysis request: {}", reason);
            }
            e.to_response(service.error_field())
        }
    }
}

async fn run_analysis(
    service: &dyn ImageAnalysisService,
    query: HashMap<String, String>,
    payload: Multipart,
) -> Result<AnalysisResponse, AnalysisError> {
    let mut form = read_analysis_form(payload, service.upload_limits()).await?;
    form.merge_query(query);
    let request = service.prepare(form)?;
    service.analyze(request).await
}

async fn health_check(model_api: web::Data<ModelApiClient>) -> HttpResponse {
    HttpResponse::Ok().json(aggregate_health(&model_api).await)
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": WELCOME_MESSAGE }))
}

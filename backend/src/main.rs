use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use xray_proxy::analysis::proxy_service::ProxyAnalysisService;
use xray_proxy::analysis::service::ImageAnalysisService;
use xray_proxy::config::ProxyConfig;
use xray_proxy::cors::build_cors;
use xray_proxy::model_api::client::ModelApiClient;
use xray_proxy::routes::configure_proxy_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ProxyConfig::from_env().map_err(|e| {
        log::error!("Invalid proxy configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let model_api = ModelApiClient::new(&config).map_err(|e| {
        log::error!("Failed to build model API client: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    log::info!(
        "[{}] Forwarding analysis requests to {} (timeout {:?})",
        config.region,
        model_api.base_url(),
        config.forward_timeout
    );
    log::info!("Allowed origins: {}", config.server.allowed_origins.join(", "));

    let service: Arc<dyn ImageAnalysisService> = Arc::new(ProxyAnalysisService::new(
        model_api.clone(),
        config.max_image_bytes,
    ));
    let service = web::Data::from(service);
    let model_api = web::Data::new(model_api);

    let allowed_origins = config.server.allowed_origins.clone();
    let bind_address = config.server.bind_address();

    log::info!("Starting proxy server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&allowed_origins))
            .app_data(service.clone())
            .app_data(model_api.clone())
            .configure(configure_proxy_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

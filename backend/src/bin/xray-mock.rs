use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use xray_proxy::analysis::mock_service::MockAnalysisService;
use xray_proxy::analysis::service::ImageAnalysisService;
use xray_proxy::config::MockConfig;
use xray_proxy::cors::build_cors;
use xray_proxy::routes::configure_analysis_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = MockConfig::from_env().map_err(|e| {
        log::error!("Invalid mock configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let service: Arc<dyn ImageAnalysisService> = Arc::new(MockAnalysisService::new(config.delay));
    let service = web::Data::from(service);

    let allowed_origins = config.server.allowed_origins.clone();
    let bind_address = config.server.bind_address();

    log::info!(
        "Starting mock analysis server on {} (simulated delay {:?})",
        bind_address,
        config.delay
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&allowed_origins))
            .app_data(service.clone())
            .configure(configure_analysis_routes)
    })
    .bind(&bind_address)?
    .run()
    .await
}

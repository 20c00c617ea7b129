mod common;

use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{test, App};
use serde_json::{json, Value};
use xray_proxy::analysis::mock_service::{MOCK_FINDINGS, MOCK_IMPRESSION, MOCK_RECOMMENDATION};
use xray_proxy::routes::configure_analysis_routes;

use common::{mock_data, MultipartBody};

macro_rules! mock_app {
    ($delay:expr) => {
        test::init_service(
            App::new()
                .app_data(mock_data($delay))
                .configure(configure_analysis_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn named_image_gets_canned_report_after_delay() {
    let delay = Duration::from_millis(150);
    let app = mock_app!(delay);
    let req = MultipartBody::new()
        .image("chest.png")
        .into_request("/api/analyze")
        .to_request();

    let started = Instant::now();
    let resp = test::call_service(&app, req).await;

    assert!(started.elapsed() >= delay);
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "findings": MOCK_FINDINGS,
            "impression": MOCK_IMPRESSION,
            "recommendation": MOCK_RECOMMENDATION
        })
    );
}

#[actix_web::test]
async fn image_content_is_ignored() {
    let app = mock_app!(Duration::ZERO);
    let req = MultipartBody::new()
        .file("image", "notes.txt", "text/plain", b"not an image")
        .into_request("/api/analyze")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["impression"], MOCK_IMPRESSION);
}

#[actix_web::test]
async fn empty_filename_is_rejected() {
    let app = mock_app!(Duration::ZERO);
    let req = MultipartBody::new()
        .image("")
        .into_request("/api/analyze")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "No selected file"}));
}

#[actix_web::test]
async fn missing_image_part_is_rejected() {
    let app = mock_app!(Duration::ZERO);
    let req = MultipartBody::new()
        .text("prompt_text", "hello")
        .into_request("/api/analyze")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "No image part in the request"}));
}

#[actix_web::test]
async fn mock_has_no_health_route() {
    let app = mock_app!(Duration::ZERO);
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

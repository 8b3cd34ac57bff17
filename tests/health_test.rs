mod common;

use axum::http::StatusCode;
use common::{setup_test_app, test_config, TestApp};

#[tokio::test]
async fn health_answers_ok_with_nothing_optional_configured() {
    let app = setup_test_app().await;

    let response = app.get("/api/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.json().await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body["timestamp"].as_str().is_some_and(|t| t.contains('T')));
    assert_eq!(body["checks"]["database"], true);
    assert_eq!(body["checks"]["jwt"], true);
    assert_eq!(body["checks"]["supabase"], false);
    assert_eq!(body["checks"]["openai"], false);
    assert_eq!(body["checks"]["cron"], false);
}

#[tokio::test]
async fn health_accepts_post_and_reports_configured_adapters() {
    let mut config = test_config();
    config.supabase_url = Some("https://projeto.supabase.co".into());
    config.supabase_service_role_key = Some("service-role".into());
    config.openai_api_key = Some("sk-test".into());
    config.cron_secret = Some("cron".into());
    let app = TestApp::new(config);

    let response = app.post("/api/health").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.json().await;
    assert_eq!(body["checks"]["supabase"], true);
    assert_eq!(body["checks"]["openai"], true);
    assert_eq!(body["checks"]["cron"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.get("/api-docs/openapi.json").send().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.json().await;
    assert!(body["paths"]["/api/quotes"].is_object());
    assert!(body["components"]["securitySchemes"]["api_jwt"].is_object());
}

mod common;

use axum::http::StatusCode;
use common::{test_config, TestApp, TEST_CRON_SECRET};

fn app_with_cron_secret() -> TestApp {
    let mut config = test_config();
    config.cron_secret = Some(TEST_CRON_SECRET.to_string());
    TestApp::new(config)
}

#[tokio::test]
async fn cron_without_configured_secret_is_unavailable() {
    let app = TestApp::new(test_config());

    let response = app
        .post("/api/cron/notifications")
        .bearer(TEST_CRON_SECRET)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn cron_with_wrong_secret_is_unauthorized() {
    let app = app_with_cron_secret();

    let response = app
        .post("/api/cron/notifications")
        .bearer("segredo-errado")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cron_without_secret_is_unauthorized() {
    let app = app_with_cron_secret();

    let response = app.post("/api/cron/notifications").send().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_jwt_does_not_open_the_cron_endpoint() {
    let app = app_with_cron_secret();
    let token = app.token_for(sevenpet_backend::models::auth::Role::Master);

    let response = app
        .post("/api/cron/notifications")
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

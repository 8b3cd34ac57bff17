mod common;

use axum::http::StatusCode;
use common::setup_test_app;
use sevenpet_backend::{models::auth::Role, services::auth::TokenService};
use uuid::Uuid;

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let app = setup_test_app().await;

    let response = app.get("/api/quotes").send().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.json().await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = setup_test_app().await;

    let response = app.get("/api/users/me").bearer("isto-nao-e-um-jwt").send().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_unauthorized() {
    let app = setup_test_app().await;
    let foreign = TokenService::new("outro-segredo".into())
        .issue(Uuid::new_v4(), Role::Master)
        .unwrap();

    let response = app.get("/api/customers").bearer(&foreign).send().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_routes_do_not_require_a_token() {
    let app = setup_test_app().await;

    // Falha na validação, antes de tocar o banco: prova que o guard não barrou
    let response = app
        .post("/api/auth/register")
        .json(&serde_json::json!({
            "name": "A",
            "email": "nao-e-email",
            "password": "123"
        }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json().await;
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn valid_token_reaches_the_handler() {
    let mut config = common::test_config();
    config.openai_api_key = None;
    let app = common::TestApp::new(config);
    let token = app.token_for(Role::Cliente);

    // O adaptador de IA responde 503 sem chave e sem tocar o banco
    let response = app
        .post("/api/ai/completions")
        .bearer(&token)
        .json(&serde_json::json!({ "prompt": "Olá" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

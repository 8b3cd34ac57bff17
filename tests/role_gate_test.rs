mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn,
    routing::get,
    Extension, Json, Router,
};
use common::{db, setup_test_app, TestApp};
use sevenpet_backend::{
    middleware::{auth::AuthenticatedUser, rbac::master_guard},
    models::auth::Role,
};
use tower::util::ServiceExt;
use uuid::Uuid;

// Rota protegida só pelo master_guard; a identidade entra por Extension,
// no lugar do auth_guard. O contador registra cada execução do handler.
fn guarded_router(identity: Option<AuthenticatedUser>, hits: Arc<AtomicUsize>) -> Router {
    let router = Router::new()
        .route(
            "/settings",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(serde_json::json!([{ "kind": "SYSTEM", "enabled": true }]))
                }
            }),
        )
        .layer(from_fn(master_guard));

    match identity {
        Some(identity) => router.layer(Extension(identity)),
        None => router,
    }
}

async fn call_guarded(identity: Option<AuthenticatedUser>) -> (StatusCode, usize) {
    let hits = Arc::new(AtomicUsize::new(0));
    let request = Request::builder().uri("/settings").body(Body::empty()).unwrap();

    let response = guarded_router(identity, hits.clone())
        .oneshot(request)
        .await
        .unwrap();

    (response.status(), hits.load(Ordering::SeqCst))
}

fn user(role: Role) -> Option<AuthenticatedUser> {
    Some(AuthenticatedUser { id: Uuid::new_v4(), role })
}

#[tokio::test]
async fn master_reaches_the_handler_exactly_once() {
    let (status, hits) = call_guarded(user(Role::Master)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn denied_roles_never_reach_the_handler() {
    for role in [Role::Cliente, Role::Funcionario, Role::Admin] {
        let (status, hits) = call_guarded(user(role)).await;

        assert_eq!(status, StatusCode::FORBIDDEN, "papel {:?}", role);
        assert_eq!(hits, 0, "papel {:?}", role);
    }

    let (status, hits) = call_guarded(None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits, 0);
}

// Precisa de um Postgres real: DATABASE_URL=... cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn master_lists_notification_settings() {
    let pool = db::connect().await;
    let mut config = common::test_config();
    config.database_url = db::database_url();
    let app = TestApp::with_pool(config, pool);

    let token = app.token_for(Role::Master);
    let response = app
        .get("/api/notification-settings/settings")
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json().await;
    let settings = body.as_array().expect("lista de configurações");
    assert!(!settings.is_empty());
    assert!(settings
        .iter()
        .any(|s| s["kind"] == "APPOINTMENT_REMINDER" && s["enabled"].is_boolean()));
}

#[tokio::test]
async fn master_group_rejects_every_other_role() {
    let app = setup_test_app().await;

    for role in [Role::Cliente, Role::Funcionario, Role::Admin] {
        let token = app.token_for(role);
        let response = app
            .get("/api/notification-settings/stats")
            .bearer(&token)
            .send()
            .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN, "papel {:?}", role);
        let body = response.json().await;
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn master_group_without_token_is_unauthorized() {
    let app = setup_test_app().await;

    let response = app
        .post("/api/admin/quotes/normalize-status")
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn normalization_is_master_only() {
    let app = setup_test_app().await;
    let token = app.token_for(Role::Admin);

    let response = app
        .post("/api/admin/quotes/normalize-status")
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_routes_reject_customers() {
    let app = setup_test_app().await;
    let token = app.token_for(Role::Cliente);

    let response = app.get("/api/customers").bearer(&token).send().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.post("/api/time-tracking/clock-in").bearer(&token).send().await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn management_routes_reject_plain_staff() {
    let app = setup_test_app().await;
    let token = app.token_for(Role::Funcionario);

    let response = app
        .post("/api/catalog/services")
        .bearer(&token)
        .json(&serde_json::json!({
            "name": "Banho",
            "basePrice": 50.0,
            "durationMinutes": 60
        }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn master_only_routes_reject_admins() {
    let app = setup_test_app().await;
    let token = app.token_for(Role::Admin);

    let response = app
        .post("/api/hr/pay-periods")
        .bearer(&token)
        .json(&serde_json::json!({ "startsOn": "2025-03-01", "endsOn": "2025-03-31" }))
        .send()
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

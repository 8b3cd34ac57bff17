// Precisa de um Postgres real: DATABASE_URL=... cargo test -- --ignored
mod common;

use chrono::{Duration, Utc};
use axum::http::StatusCode;
use common::{
    db::{connect, database_url, insert_customer, insert_user},
    setup_test_app,
};
use sevenpet_backend::models::auth::Role;
use rust_decimal::Decimal;
use sevenpet_backend::{common::error::AppError, config::AppState};
use sqlx::PgPool;
use uuid::Uuid;

fn state(pool: &PgPool) -> AppState {
    let mut config = common::test_config();
    config.database_url = database_url();
    AppState::with_pool(config, pool.clone())
}

// ---
// Lembretes
// ---

#[tokio::test]
#[ignore]
async fn overlapping_runs_send_each_reminder_once() {
    let pool = connect().await;
    let customer = insert_customer(&pool).await;

    let appointment_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO appointments (customer_id, pet_id, service_id, scheduled_at, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(customer.customer_id)
    .bind(customer.pet_id)
    .bind(customer.service_id)
    .bind(Utc::now() + Duration::hours(2))
    .bind(Decimal::new(5000, 2))
    .fetch_one(&pool)
    .await
    .unwrap();

    let state = state(&pool);
    let now = Utc::now();
    let (a, b) = tokio::join!(state.dispatch_service.run(now), state.dispatch_service.run(now));
    a.unwrap();
    b.unwrap();

    let stored: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = 'APPOINTMENT_REMINDER'",
    )
    .bind(customer.user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(stored, 1);

    let marked: bool = sqlx::query_scalar(
        "SELECT reminder_sent_at IS NOT NULL FROM appointments WHERE id = $1",
    )
    .bind(appointment_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(marked);

    // Uma terceira execução não encontra mais nada deste agendamento
    state.dispatch_service.run(Utc::now()).await.unwrap();
    let stored_again: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = 'APPOINTMENT_REMINDER'",
    )
    .bind(customer.user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(stored_again, 1);
}

// ---
// Assinaturas
// ---

#[tokio::test]
#[ignore]
async fn endpoint_of_another_user_is_not_taken_over() {
    let pool = connect().await;
    let owner = insert_user(&pool, "CLIENTE").await;
    let intruder = insert_user(&pool, "CLIENTE").await;
    let state = state(&pool);
    let endpoint = format!("https://fcm.googleapis.com/fcm/send/{}", Uuid::new_v4().simple());

    let original = state
        .notification_service
        .subscribe(owner, &endpoint, "chave-a", "auth-a", None)
        .await
        .unwrap();
    assert_eq!(original.user_id, owner);

    let taken = state
        .notification_service
        .subscribe(intruder, &endpoint, "chave-b", "auth-b", None)
        .await;
    assert!(matches!(taken, Err(AppError::Conflict(_))));

    let (user_id, p256dh): (Uuid, String) = sqlx::query_as(
        "SELECT user_id, p256dh FROM notification_subscriptions WHERE endpoint = $1",
    )
    .bind(&endpoint)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(user_id, owner);
    assert_eq!(p256dh, "chave-a");

    // O dono renova as chaves normalmente
    let renewed = state
        .notification_service
        .subscribe(owner, &endpoint, "chave-c", "auth-c", Some("Firefox"))
        .await
        .unwrap();
    assert_eq!(renewed.id, original.id);
    assert_eq!(renewed.p256dh, "chave-c");
}

#[tokio::test]
#[ignore]
async fn internal_endpoint_is_rejected_on_subscribe() {
    let pool = connect().await;
    let user = insert_user(&pool, "CLIENTE").await;
    let state = state(&pool);

    let result = state
        .notification_service
        .subscribe(user, "http://127.0.0.1:8080/hook", "chave", "auth", None)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notification_subscriptions WHERE user_id = $1")
        .bind(user)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn plaintext_endpoint_is_refused_before_touching_the_database() {
    let app = setup_test_app().await;
    let token = app.token_for(Role::Cliente);

    for endpoint in ["http://127.0.0.1:8080/hook", "https://169.254.169.254/latest"] {
        let response = app
            .post("/api/notifications/subscribe")
            .bearer(&token)
            .json(&serde_json::json!({
                "endpoint": endpoint,
                "keys": { "p256dh": "chave", "auth": "auth" }
            }))
            .send()
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{endpoint}");
    }
}

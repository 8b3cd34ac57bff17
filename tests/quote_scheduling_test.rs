// Precisa de um Postgres real: DATABASE_URL=... cargo test -- --ignored
mod common;

use chrono::{Duration, Utc};
use common::db::{connect, database_url, insert_customer, insert_quote};
use sevenpet_backend::{common::error::AppError, config::AppState, models::quote::QuoteStatus};
use sqlx::PgPool;
use uuid::Uuid;

fn state(pool: &PgPool) -> AppState {
    let mut config = common::test_config();
    config.database_url = database_url();
    AppState::with_pool(config, pool.clone())
}

async fn appointments_for_quote(pool: &PgPool, quote_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM appointments WHERE quote_id = $1")
        .bind(quote_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn concurrent_scheduling_creates_one_set_of_appointments() {
    let pool = connect().await;
    let customer = insert_customer(&pool).await;
    let quote_id = insert_quote(&pool, &customer, "APROVADO", true).await;
    let state = state(&pool);

    let first_date = Utc::now() + Duration::days(30);
    let (a, b) = tokio::join!(
        state.quote_service.schedule(quote_id, first_date, None),
        state.quote_service.schedule(quote_id, first_date, None),
    );

    let (ok, rejected) = match (a, b) {
        (Ok(created), Err(e)) | (Err(e), Ok(created)) => (created, e),
        (a, b) => panic!("esperado um sucesso e um conflito: {:?} / {:?}", a.is_ok(), b.is_ok()),
    };

    assert_eq!(ok.len(), 4);
    assert!(matches!(rejected, AppError::Conflict(_)));
    assert_eq!(appointments_for_quote(&pool, quote_id).await, 4);

    let raw: String = sqlx::query_scalar("SELECT status FROM quotes WHERE id = $1")
        .bind(quote_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, QuoteStatus::Agendado.as_str());
}

#[tokio::test]
#[ignore]
async fn scheduled_quote_cannot_be_scheduled_again() {
    let pool = connect().await;
    let customer = insert_customer(&pool).await;
    let quote_id = insert_quote(&pool, &customer, "APROVADO", false).await;
    let state = state(&pool);

    let first_date = Utc::now() + Duration::days(30);
    let created = state.quote_service.schedule(quote_id, first_date, None).await.unwrap();
    assert_eq!(created.len(), 1);

    let again = state.quote_service.schedule(quote_id, first_date, None).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
    assert_eq!(appointments_for_quote(&pool, quote_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_status_changes_respect_final_state() {
    let pool = connect().await;
    let customer = insert_customer(&pool).await;
    let quote_id = insert_quote(&pool, &customer, "APROVADO", false).await;
    let state = state(&pool);

    let first_date = Utc::now() + Duration::days(30);
    let (scheduled, rejected) = tokio::join!(
        state.quote_service.schedule(quote_id, first_date, None),
        state.quote_service.update_status(quote_id, QuoteStatus::Rejeitado),
    );

    // Os dois destinos são finais: quem chega depois vê o outro já gravado
    let agendado = scheduled.is_ok();
    let rejeitado = rejected.is_ok();
    assert!(agendado != rejeitado, "exatamente uma mudança deveria vencer");
    if !agendado {
        assert!(matches!(scheduled, Err(AppError::Conflict(_))));
    }
    if !rejeitado {
        assert!(matches!(rejected, Err(AppError::Conflict(_))));
    }

    let expected = if agendado { 1 } else { 0 };
    assert_eq!(appointments_for_quote(&pool, quote_id).await, expected);
}

// Precisa de um Postgres real: DATABASE_URL=... cargo test -- --ignored
mod common;

use common::db::{connect, database_url, insert_customer, insert_quote};
use sevenpet_backend::{
    config::AppState,
    db::QuoteRepository,
    models::quote::QuoteStatus,
};

#[tokio::test]
#[ignore]
async fn legacy_status_is_rewritten_once() {
    let pool = connect().await;
    let customer = insert_customer(&pool).await;
    let quote_id = insert_quote(&pool, &customer, "SOLICITACAO", false).await;

    // O literal antigo já é lido como SOLICITADO
    let repo = QuoteRepository::new(pool.clone());
    let quote = repo.find_by_id(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.status, QuoteStatus::Solicitado);

    let mut config = common::test_config();
    config.database_url = database_url();
    let state = AppState::with_pool(config, pool.clone());

    let first = state.quote_service.normalize_statuses().await.unwrap();
    assert!(first.updated >= 1);
    assert_eq!(first.remaining, 0);

    let raw: String = sqlx::query_scalar("SELECT status FROM quotes WHERE id = $1")
        .bind(quote_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(raw, "SOLICITADO");

    let second = state.quote_service.normalize_statuses().await.unwrap();
    assert_eq!(second.updated, 0);
    assert_eq!(second.remaining, 0);
}

// src/db/quote_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{Quote, QuoteStatus, LEGACY_REQUESTED_STATUS},
};

const QUOTE_COLUMNS: &str = "id, customer_id, pet_id, service_id, status, is_recurring, total, \
     desired_date, notes, deleted_at, created_at, updated_at";

// Dados de um novo orçamento, já com o total calculado pelo serviço
pub struct NewQuote<'a> {
    pub customer_id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub is_recurring: bool,
    pub total: Decimal,
    pub desired_date: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, quote: NewQuote<'_>) -> Result<Quote, AppError> {
        let created = sqlx::query_as::<_, Quote>(&format!(
            r#"
            INSERT INTO quotes (customer_id, pet_id, service_id, status, is_recurring, total, desired_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(quote.customer_id)
        .bind(quote.pet_id)
        .bind(quote.service_id)
        .bind(QuoteStatus::Solicitado)
        .bind(quote.is_recurring)
        .bind(quote.total)
        .bind(quote.desired_date)
        .bind(quote.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(quote)
    }

    /// Trava a linha até o fim da transação; o status lido não muda por baixo
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(quote)
    }

    /// `None` lista os orçamentos de todos os clientes
    pub async fn list(&self, customer_id: Option<Uuid>) -> Result<Vec<Quote>, AppError> {
        let quotes = sqlx::query_as::<_, Quote>(&format!(
            r#"
            SELECT {QUOTE_COLUMNS} FROM quotes
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: QuoteStatus,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Quote>(&format!(
            r#"
            UPDATE quotes SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {QUOTE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".into()))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE quotes SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PADRONIZAÇÃO DE STATUS
    // =========================================================================

    /// Reescreve o literal antigo para o valor canônico. Devolve linhas afetadas.
    pub async fn normalize_legacy_status<'e, E>(&self, executor: E) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE quotes SET status = $1, updated_at = NOW() WHERE status = $2")
            .bind(QuoteStatus::Solicitado)
            .bind(LEGACY_REQUESTED_STATUS)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_legacy_status<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE status = $1")
            .bind(LEGACY_REQUESTED_STATUS)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}

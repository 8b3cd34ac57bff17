// src/db/support_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::support::{SupportTicket, TicketStatus},
};

const TICKET_COLUMNS: &str =
    "id, user_id, subject, message, status, updated_by, resolved_at, created_at, updated_at";

#[derive(Clone)]
pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, subject: &str, message: &str) -> Result<SupportTicket, AppError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            INSERT INTO support_tickets (user_id, subject, message)
            VALUES ($1, $2, $3)
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(ticket)
    }

    /// `None` lista os chamados de todos os usuários
    pub async fn list(&self, user_id: Option<Uuid>) -> Result<Vec<SupportTicket>, AppError> {
        let tickets = sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            SELECT {TICKET_COLUMNS} FROM support_tickets
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tickets)
    }

    // resolved_at só é preenchido na primeira vez que o chamado é resolvido/fechado
    pub async fn update_status(
        &self,
        id: Uuid,
        status: TicketStatus,
        updated_by: Uuid,
    ) -> Result<SupportTicket, AppError> {
        sqlx::query_as::<_, SupportTicket>(&format!(
            r#"
            UPDATE support_tickets
            SET status = $2,
                updated_by = $3,
                resolved_at = CASE WHEN $4 THEN COALESCE(resolved_at, NOW()) ELSE NULL END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TICKET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(updated_by)
        .bind(status.is_resolution())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Chamado não encontrado.".into()))
    }
}

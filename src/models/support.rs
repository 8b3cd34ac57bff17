// src/models/support.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Aberto,
    EmAndamento,
    Resolvido,
    Fechado,
}

impl TicketStatus {
    pub fn is_resolution(&self) -> bool {
        matches!(self, TicketStatus::Resolvido | TicketStatus::Fechado)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Aberto => "aberto",
            TicketStatus::EmAndamento => "em andamento",
            TicketStatus::Resolvido => "resolvido",
            TicketStatus::Fechado => "fechado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Não consigo remarcar o banho")]
    pub subject: String,
    pub message: String,
    pub status: TicketStatus,
    pub updated_by: Option<Uuid>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

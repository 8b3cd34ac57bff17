// src/models/appointment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Agendado,
    Confirmado,
    EmAndamento,
    Finalizado,
    Cancelado,
}

impl AppointmentStatus {
    /// FINALIZADO e CANCELADO encerram o ciclo do agendamento.
    pub fn is_closed(&self) -> bool {
        matches!(self, AppointmentStatus::Finalizado | AppointmentStatus::Cancelado)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Pendente,
    Pago,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Dinheiro,
    Pix,
    CartaoCredito,
    CartaoDebito,
}

// --- AGENDAMENTO ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub quote_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[schema(example = "89.90")]
    pub price: Decimal,
    pub notes: Option<String>,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Agendamento que precisa de lembrete (consulta do cron)
#[derive(Debug, Clone, FromRow)]
pub struct ReminderCandidate {
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub pet_name: String,
    pub service_name: String,
    pub scheduled_at: DateTime<Utc>,
}

// --- FATURA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub quote_id: Option<Uuid>,
    #[schema(example = "89.90")]
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub id: Uuid,
    pub invoice_id: Uuid,
    #[schema(example = "Banho e Tosa - Thor")]
    pub description: String,
    #[schema(example = 1)]
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub invoice_id: Uuid,
    #[schema(example = "89.90")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub received_by: Option<Uuid>,
    pub paid_at: DateTime<Utc>,
}

// Fatura com linhas e dados de impressão (PDF)
#[derive(Debug, Clone)]
pub struct InvoiceDocument {
    pub invoice: Invoice,
    pub customer_name: String,
    pub lines: Vec<InvoiceLine>,
    pub paid_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
}

// Resultado da mudança de status: FINALIZADO gera a fatura junto
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStatusChange {
    pub appointment: Appointment,
    pub invoice: Option<Invoice>,
}

// src/models/hr.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pay_period_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PayPeriodStatus {
    Aberto,
    Fechado,
}

// ---
// 1. Staff (Perfil de Funcionário)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Tosador")]
    pub position: String,
    #[schema(example = "2500.00")]
    pub base_salary: Decimal,
    #[schema(value_type = String, format = Date, example = "2024-02-01")]
    pub hired_at: NaiveDate,
    pub active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Funcionário com nome do usuário (listagens)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub position: String,
    pub base_salary: Decimal,
    pub active: bool,
}

// ---
// 2. Ponto
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: Uuid,
    pub staff_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    #[schema(example = 480)]
    pub worked_minutes: Option<i64>,
}

// ---
// 3. Folha de pagamento
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayPeriod {
    pub id: Uuid,
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub starts_on: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-03-31")]
    pub ends_on: NaiveDate,
    pub status: PayPeriodStatus,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayAdjustment {
    pub id: Uuid,
    pub pay_period_id: Uuid,
    pub staff_id: Uuid,
    #[schema(example = "-50.00")]
    pub amount: Decimal,
    #[schema(example = "Adiantamento")]
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayStatement {
    pub id: Uuid,
    pub pay_period_id: Uuid,
    pub staff_id: Uuid,
    pub gross: Decimal,
    pub adjustments_total: Decimal,
    pub net: Decimal,
    pub worked_minutes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosedPeriod {
    pub period: PayPeriod,
    pub statements: Vec<PayStatement>,
}

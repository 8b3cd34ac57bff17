// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Serviço do catálogo (banho, tosa, hidratação...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: Uuid,
    #[schema(example = "Banho e Tosa")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "89.90")]
    pub base_price: Decimal,
    #[schema(example = 90)]
    pub duration_minutes: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "Shampoo Neutro 500ml")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "39.90")]
    pub base_price: Decimal,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Pacote de sessões de um serviço (ex: 4 banhos por mês)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
    pub id: Uuid,
    pub service_id: Uuid,
    #[schema(example = "Pacote Mensal - 4 Banhos")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 4)]
    pub sessions: i32,
    #[schema(example = "299.90")]
    pub price: Decimal,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// src/models/customer.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ---
// 1. Customer (Perfil de Cliente)
// ---
// Ligado 1:1 a um User com papel CLIENTE
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,
    #[schema(example = "123.456.789-00")]
    pub document_number: Option<String>,
    #[schema(example = "Rua das Flores, 123 - Centro")]
    pub address: Option<String>,
    pub blocked: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Cliente com nome e e-mail do usuário (listagens da equipe)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@7pet.com.br")]
    pub email: String,
    pub phone: Option<String>,
    pub blocked: bool,
    pub pet_count: i64,
    pub created_at: DateTime<Utc>,
}

// ---
// 2. Pet
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(example = "Thor")]
    pub name: String,
    #[schema(example = "Cachorro")]
    pub species: String,
    #[schema(example = "Golden Retriever")]
    pub breed: Option<String>,
    #[schema(example = "GRANDE")]
    pub size: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2020-05-20")]
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de um novo pet (o dono é resolvido pelo serviço)
#[derive(Debug, Clone)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub size: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadResponse {
    pub pet_id: Uuid,
    #[schema(example = "https://xyz.supabase.co/storage/v1/object/public/pets/abc/foto.jpg")]
    pub photo_url: String,
}

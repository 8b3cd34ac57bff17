// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Cliente,
    Funcionario,
    Admin,
    Master,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Cliente => "CLIENTE",
            Role::Funcionario => "FUNCIONARIO",
            Role::Admin => "ADMIN",
            Role::Master => "MASTER",
        }
    }

    /// Qualquer papel da equipe interna (não cliente).
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Cliente)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "ana@7pet.com.br")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    #[schema(example = "Banho e Tosa")]
    pub division: Option<String>,
    pub active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Usuário pode autenticar: ativo e não removido.
    pub fn can_login(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

// Dados para registro de um novo cliente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@7pet.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    #[schema(example = "segredo123")]
    pub password: String,
    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ana@7pet.com.br")]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role, // Papel no momento da emissão
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

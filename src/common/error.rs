// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// O tipo de erro único da aplicação. Toda camada (repo, serviço, adaptador)
// devolve AppError e o handler só precisa do `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("{0}")]
    Conflict(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("Conta desativada")]
    AccountDisabled,

    #[error("{0}")]
    NotFound(String),

    // Adaptador externo sem credenciais configuradas
    #[error("{0}")]
    ServiceUnavailable(String),

    // Erro devolvido por um provedor externo (storage, OpenAI, push), repassado sem alteração
    #[error("Erro do provedor externo ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de comunicação HTTP: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::AccountDisabled => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Upstream { .. } | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.".to_string(),
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::AccountDisabled => "Esta conta está desativada.".to_string(),
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::ServiceUnavailable(msg) => msg,
            ref e @ (AppError::Upstream { .. } | AppError::HttpClient(_)) => {
                tracing::warn!("Falha em provedor externo: {}", e);
                e.to_string()
            }

            // Todo o resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Converte violação de chave única em Conflict, o resto segue como erro de banco.
pub fn map_unique_violation(e: sqlx::Error, message: impl Into<String>) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.into());
        }
    }
    e.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_http_status() {
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_error_keeps_provider_message() {
        let err = AppError::Upstream { status: 413, message: "Payload too large".into() };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("Payload too large"));
    }
}

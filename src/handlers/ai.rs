// src/handlers/ai.rs

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CompletionPayload {
    #[validate(length(min = 1, max = 8000, message = "O prompt deve ter entre 1 e 8000 caracteres."))]
    #[schema(example = "Sugira uma mensagem de boas-vindas para um novo cliente.")]
    pub prompt: String,

    pub system: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletionResponse {
    pub content: String,
}

#[utoipa::path(
    post,
    path = "/api/ai/completions",
    tag = "AI",
    request_body = CompletionPayload,
    responses(
        (status = 200, description = "Texto gerado", body = CompletionResponse),
        (status = 502, description = "Falha do provedor"),
        (status = 503, description = "OPENAI_API_KEY não configurada")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CompletionPayload>,
) -> Result<Json<CompletionResponse>, AppError> {
    payload.validate()?;

    tracing::debug!("Completion solicitada por {}", user.id);
    let content = app_state
        .completion_client
        .complete(payload.system.as_deref(), &payload.prompt)
        .await?;

    Ok(Json(CompletionResponse { content }))
}

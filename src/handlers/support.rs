// src/handlers/support.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{RequireRole, Staff},
    },
    models::support::{SupportTicket, TicketStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenTicketPayload {
    #[validate(length(min = 3, max = 150, message = "O assunto deve ter entre 3 e 150 caracteres."))]
    #[schema(example = "Não consigo remarcar o banho")]
    pub subject: String,

    #[validate(length(min = 1, max = 5000, message = "A mensagem é obrigatória."))]
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTicketStatusPayload {
    pub status: TicketStatus,
}

#[utoipa::path(
    post,
    path = "/api/support",
    tag = "Support",
    request_body = OpenTicketPayload,
    responses((status = 201, description = "Chamado aberto", body = SupportTicket)),
    security(("api_jwt" = []))
)]
pub async fn open_ticket(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<OpenTicketPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let ticket = app_state
        .support_service
        .open_ticket(user.id, payload.subject.trim(), payload.message.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

#[utoipa::path(
    get,
    path = "/api/support",
    tag = "Support",
    responses((status = 200, description = "Chamados visíveis ao usuário", body = Vec<SupportTicket>)),
    security(("api_jwt" = []))
)]
pub async fn list_tickets(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<SupportTicket>>, AppError> {
    Ok(Json(app_state.support_service.list(&user).await?))
}

#[utoipa::path(
    patch,
    path = "/api/support/{id}/status",
    tag = "Support",
    params(("id" = Uuid, Path, description = "ID do chamado")),
    request_body = UpdateTicketStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = SupportTicket),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ticket_status(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTicketStatusPayload>,
) -> Result<Json<SupportTicket>, AppError> {
    let ticket = app_state
        .support_service
        .update_status(guard.identity(), id, payload.status)
        .await?;
    Ok(Json(ticket))
}

// src/handlers/quotes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
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
    models::{
        appointment::Appointment,
        quote::{Quote, QuoteStatus},
    },
    services::quote_service::QuoteRequest,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    /// Obrigatório quando quem solicita é da equipe
    pub customer_id: Option<Uuid>,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    #[serde(default)]
    #[schema(example = true)]
    pub is_recurring: bool,
    pub desired_date: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "As observações devem ter no máximo 1000 caracteres."))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteStatusPayload {
    pub status: QuoteStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuotePayload {
    /// Data do primeiro atendimento; os seguintes são semanais
    pub first_date: DateTime<Utc>,
    pub staff_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Orçamento solicitado", body = Quote),
        (status = 403, description = "Cliente bloqueado"),
        (status = 404, description = "Pet ou serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let quote = app_state
        .quote_service
        .create(
            &user,
            QuoteRequest {
                customer_id: payload.customer_id,
                pet_id: payload.pet_id,
                service_id: payload.service_id,
                is_recurring: payload.is_recurring,
                desired_date: payload.desired_date,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(quote)))
}

#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses((status = 200, description = "Orçamentos visíveis ao usuário", body = Vec<Quote>)),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Quote>>, AppError> {
    Ok(Json(app_state.quote_service.list(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento", body = Quote),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(app_state.quote_service.get(&user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    request_body = UpdateQuoteStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Quote),
        (status = 409, description = "Orçamento em estado final")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quote_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuoteStatusPayload>,
) -> Result<Json<Quote>, AppError> {
    Ok(Json(app_state.quote_service.update_status(id, payload.status).await?))
}

#[utoipa::path(
    post,
    path = "/api/quotes/{id}/schedule",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    request_body = ScheduleQuotePayload,
    responses(
        (status = 201, description = "Agendamentos criados", body = Vec<Appointment>),
        (status = 409, description = "Orçamento não aprovado")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_quote(
    State(app_state): State<AppState>,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleQuotePayload>,
) -> Result<impl IntoResponse, AppError> {
    let appointments = app_state
        .quote_service
        .schedule(id, payload.first_date, payload.staff_id)
        .await?;

    Ok((StatusCode::CREATED, Json(appointments)))
}

#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 204, description = "Orçamento removido"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.quote_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

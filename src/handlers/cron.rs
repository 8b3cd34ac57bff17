// src/handlers/cron.rs
//
// Chamado pelo agendador externo; o segredo é checado pelo cron_guard.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{common::error::AppError, config::AppState, models::notification::DispatchReport};

#[utoipa::path(
    post,
    path = "/api/cron/notifications",
    tag = "Cron",
    responses(
        (status = 200, description = "Resumo da execução", body = DispatchReport),
        (status = 401, description = "Segredo ausente ou inválido"),
        (status = 503, description = "CRON_SECRET não configurado")
    ),
    security(("cron_secret" = []))
)]
pub async fn dispatch_notifications(
    State(app_state): State<AppState>,
) -> Result<Json<DispatchReport>, AppError> {
    let report = app_state.dispatch_service.run(Utc::now()).await?;
    Ok(Json(report))
}

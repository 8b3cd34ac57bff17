// src/handlers/admin.rs

use axum::{extract::State, Json};

use crate::{common::error::AppError, config::AppState, models::quote::NormalizationReport};

// Idempotente: uma segunda execução atualiza zero linhas
#[utoipa::path(
    post,
    path = "/api/admin/quotes/normalize-status",
    tag = "Admin",
    responses(
        (status = 200, description = "Status legados reescritos", body = NormalizationReport),
        (status = 403, description = "Apenas MASTER")
    ),
    security(("api_jwt" = []))
)]
pub async fn normalize_quote_statuses(
    State(app_state): State<AppState>,
) -> Result<Json<NormalizationReport>, AppError> {
    Ok(Json(app_state.quote_service.normalize_statuses().await?))
}

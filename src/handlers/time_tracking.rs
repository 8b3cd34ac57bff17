// src/handlers/time_tracking.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{Management, RequireRole, Staff},
    models::hr::TimeEntry,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    pub staff_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/time-tracking/clock-in",
    tag = "Time Tracking",
    responses(
        (status = 201, description = "Entrada registrada", body = TimeEntry),
        (status = 409, description = "Já existe ponto aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_in(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.hr_service.clock_in(guard.identity().id).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    post,
    path = "/api/time-tracking/clock-out",
    tag = "Time Tracking",
    responses(
        (status = 200, description = "Saída registrada", body = TimeEntry),
        (status = 409, description = "Nenhum ponto aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_out(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
) -> Result<Json<TimeEntry>, AppError> {
    Ok(Json(app_state.hr_service.clock_out(guard.identity().id).await?))
}

#[utoipa::path(
    get,
    path = "/api/time-tracking/entries",
    tag = "Time Tracking",
    responses((status = 200, description = "Registros do funcionário autenticado", body = Vec<TimeEntry>)),
    security(("api_jwt" = []))
)]
pub async fn my_entries(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
) -> Result<Json<Vec<TimeEntry>>, AppError> {
    Ok(Json(app_state.hr_service.my_entries(guard.identity().id).await?))
}

#[utoipa::path(
    get,
    path = "/api/time-tracking/entries/all",
    tag = "Time Tracking",
    params(EntryFilter),
    responses((status = 200, description = "Todos os registros", body = Vec<TimeEntry>)),
    security(("api_jwt" = []))
)]
pub async fn all_entries(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Query(filter): Query<EntryFilter>,
) -> Result<Json<Vec<TimeEntry>>, AppError> {
    Ok(Json(app_state.hr_service.all_entries(filter.staff_id).await?))
}

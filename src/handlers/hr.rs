// src/handlers/hr.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    middleware::rbac::{Management, MasterOnly, RequireRole, Staff},
    models::hr::{
        ClosedPeriod, PayAdjustment, PayPeriod, PayStatement, Staff as StaffProfile, StaffSummary,
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HireStaffPayload {
    pub user_id: Uuid,

    #[validate(length(min = 2, message = "O cargo é obrigatório."))]
    #[schema(example = "Tosador")]
    pub position: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 2500.00)]
    pub base_salary: Decimal,

    /// Padrão: hoje
    #[schema(value_type = Option<String>, format = Date, example = "2025-03-01")]
    pub hired_at: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayPeriodPayload {
    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub starts_on: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-03-31")]
    pub ends_on: NaiveDate,
}

// Valor negativo é desconto, positivo é bônus
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentPayload {
    pub staff_id: Uuid,

    #[schema(value_type = f64, example = -50.00)]
    pub amount: Decimal,

    #[validate(length(min = 3, message = "Informe o motivo do ajuste."))]
    #[schema(example = "Vale-transporte")]
    pub reason: String,
}

// =============================================================================
//  1. FUNCIONÁRIOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/hr/staff",
    tag = "HR",
    responses((status = 200, description = "Funcionários ativos", body = Vec<StaffSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
) -> Result<Json<Vec<StaffSummary>>, AppError> {
    Ok(Json(app_state.hr_service.list_staff().await?))
}

#[utoipa::path(
    post,
    path = "/api/hr/staff",
    tag = "HR",
    request_body = HireStaffPayload,
    responses(
        (status = 201, description = "Funcionário contratado", body = StaffProfile),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "Usuário já é funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn hire_staff(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Json(payload): Json<HireStaffPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let staff = app_state
        .hr_service
        .hire(payload.user_id, payload.position.trim(), payload.base_salary, payload.hired_at)
        .await?;

    Ok((StatusCode::CREATED, Json(staff)))
}

// =============================================================================
//  2. FOLHA DE PAGAMENTO
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/hr/pay-periods",
    tag = "HR",
    request_body = CreatePayPeriodPayload,
    responses(
        (status = 201, description = "Período aberto", body = PayPeriod),
        (status = 400, description = "Datas inválidas"),
        (status = 409, description = "Período já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pay_period(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Json(payload): Json<CreatePayPeriodPayload>,
) -> Result<impl IntoResponse, AppError> {
    let period = app_state
        .hr_service
        .create_period(payload.starts_on, payload.ends_on)
        .await?;

    Ok((StatusCode::CREATED, Json(period)))
}

#[utoipa::path(
    get,
    path = "/api/hr/pay-periods",
    tag = "HR",
    responses((status = 200, description = "Períodos", body = Vec<PayPeriod>)),
    security(("api_jwt" = []))
)]
pub async fn list_pay_periods(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
) -> Result<Json<Vec<PayPeriod>>, AppError> {
    Ok(Json(app_state.hr_service.list_periods().await?))
}

#[utoipa::path(
    post,
    path = "/api/hr/pay-periods/{id}/adjustments",
    tag = "HR",
    params(("id" = Uuid, Path, description = "ID do período")),
    request_body = AdjustmentPayload,
    responses(
        (status = 201, description = "Ajuste lançado", body = PayAdjustment),
        (status = 409, description = "Período fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_adjustment(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdjustmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let adjustment = app_state
        .hr_service
        .add_adjustment(id, payload.staff_id, payload.amount, payload.reason.trim())
        .await?;

    Ok((StatusCode::CREATED, Json(adjustment)))
}

#[utoipa::path(
    post,
    path = "/api/hr/pay-periods/{id}/close",
    tag = "HR",
    params(("id" = Uuid, Path, description = "ID do período")),
    responses(
        (status = 200, description = "Período fechado com holerites", body = ClosedPeriod),
        (status = 409, description = "Período já fechado")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_pay_period(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClosedPeriod>, AppError> {
    Ok(Json(app_state.hr_service.close_period(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/hr/pay-periods/{id}/statements",
    tag = "HR",
    params(("id" = Uuid, Path, description = "ID do período")),
    responses((status = 200, description = "Holerites do período", body = Vec<PayStatement>)),
    security(("api_jwt" = []))
)]
pub async fn period_statements(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PayStatement>>, AppError> {
    Ok(Json(app_state.hr_service.period_statements(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/hr/statements/me",
    tag = "HR",
    responses(
        (status = 200, description = "Holerites do funcionário autenticado", body = Vec<PayStatement>),
        (status = 404, description = "Sem perfil de funcionário")
    ),
    security(("api_jwt" = []))
)]
pub async fn my_statements(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
) -> Result<Json<Vec<PayStatement>>, AppError> {
    Ok(Json(app_state.hr_service.my_statements(guard.identity().id).await?))
}

// src/handlers/appointments.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{RequireRole, Staff},
    },
    models::appointment::{
        Appointment, AppointmentStatus, AppointmentStatusChange, Invoice, PaymentMethod,
        PaymentReceipt,
    },
};

// =============================================================================
//  1. AGENDAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentRange {
    /// Início (inclusivo)
    pub from: Option<DateTime<Utc>>,
    /// Fim (exclusivo)
    pub to: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    tag = "Appointments",
    params(AppointmentRange),
    responses((status = 200, description = "Agendamentos", body = Vec<Appointment>)),
    security(("api_jwt" = []))
)]
pub async fn list_appointments(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(range): Query<AppointmentRange>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if to <= from {
            return Err(AppError::BadRequest("'to' deve ser posterior a 'from'.".into()));
        }
    }

    let appointments = app_state
        .appointment_service
        .list(&user, range.from, range.to)
        .await?;

    Ok(Json(appointments))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusPayload {
    pub status: AppointmentStatus,
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    tag = "Appointments",
    params(("id" = Uuid, Path, description = "ID do agendamento")),
    request_body = UpdateAppointmentStatusPayload,
    responses(
        (status = 200, description = "Status atualizado (e fatura, se finalizado)", body = AppointmentStatusChange),
        (status = 409, description = "Agendamento já encerrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_appointment_status(
    State(app_state): State<AppState>,
    _guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusPayload>,
) -> Result<Json<AppointmentStatusChange>, AppError> {
    let change = app_state
        .appointment_service
        .update_status(id, payload.status)
        .await?;

    Ok(Json(change))
}

// =============================================================================
//  2. FATURAS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    responses((status = 200, description = "Faturas", body = Vec<Invoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Invoice>>, AppError> {
    Ok(Json(app_state.appointment_service.list_invoices(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{id}/pdf",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn invoice_pdf(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let pdf_bytes = app_state.appointment_service.invoice_pdf(&user, id).await?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let disposition = format!("attachment; filename=\"fatura_{}.pdf\"", id);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, pdf_bytes).into_response())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = f64, example = 89.90)]
    pub amount: Decimal,
    pub method: PaymentMethod,
}

#[utoipa::path(
    post,
    path = "/api/invoices/{id}/payments",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = PaymentReceipt),
        (status = 409, description = "Fatura paga ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    guard: RequireRole<Staff>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let receipt = app_state
        .appointment_service
        .record_payment(id, payload.amount, payload.method, guard.identity().id)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

// src/handlers/notification_settings.rs
//
// Grupo inteiro protegido pelo master_guard (ver routes.rs)

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::notifications::UpdatedCount,
    middleware::auth::AuthenticatedUser,
    models::notification::{
        NotificationPreference, NotificationSetting, NotificationStats, NotificationType,
        UserNotificationSummary,
    },
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleNotificationPayload {
    #[schema(example = false)]
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkPreferencePayload {
    #[validate(length(min = 1, message = "Informe ao menos um usuário."))]
    pub user_ids: Vec<Uuid>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub enabled: bool,
}

// =============================================================================
//  1. CONFIGURAÇÃO GLOBAL POR TIPO
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/notification-settings/settings",
    tag = "Notification Settings",
    responses(
        (status = 200, description = "Configurações globais", body = Vec<NotificationSetting>),
        (status = 403, description = "Apenas MASTER")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_settings(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<NotificationSetting>>, AppError> {
    Ok(Json(app_state.notification_service.list_settings().await?))
}

#[utoipa::path(
    put,
    path = "/api/notification-settings/settings/{type}",
    tag = "Notification Settings",
    params(("type" = NotificationType, Path, description = "Tipo de notificação")),
    request_body = ToggleNotificationPayload,
    responses((status = 200, description = "Configuração atualizada", body = NotificationSetting)),
    security(("api_jwt" = []))
)]
pub async fn update_setting(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(kind): Path<NotificationType>,
    Json(payload): Json<ToggleNotificationPayload>,
) -> Result<Json<NotificationSetting>, AppError> {
    let setting = app_state
        .notification_service
        .update_setting(kind, payload.enabled, user.id)
        .await?;
    Ok(Json(setting))
}

// =============================================================================
//  2. PREFERÊNCIAS POR USUÁRIO
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/notification-settings/users/{userId}/preferences",
    tag = "Notification Settings",
    params(("userId" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Preferências gravadas", body = Vec<NotificationPreference>),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn user_preferences(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<NotificationPreference>>, AppError> {
    Ok(Json(app_state.notification_service.user_preferences(user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/notification-settings/users/{userId}/preferences/{type}",
    tag = "Notification Settings",
    params(
        ("userId" = Uuid, Path, description = "ID do usuário"),
        ("type" = NotificationType, Path, description = "Tipo de notificação")
    ),
    request_body = ToggleNotificationPayload,
    responses(
        (status = 200, description = "Preferência atualizada", body = NotificationPreference),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user_preference(
    State(app_state): State<AppState>,
    Path((user_id, kind)): Path<(Uuid, NotificationType)>,
    Json(payload): Json<ToggleNotificationPayload>,
) -> Result<Json<NotificationPreference>, AppError> {
    let preference = app_state
        .notification_service
        .update_user_preference(user_id, kind, payload.enabled)
        .await?;
    Ok(Json(preference))
}

#[utoipa::path(
    put,
    path = "/api/notification-settings/preferences/bulk",
    tag = "Notification Settings",
    request_body = BulkPreferencePayload,
    responses((status = 200, description = "Preferências gravadas", body = UpdatedCount)),
    security(("api_jwt" = []))
)]
pub async fn bulk_update_preferences(
    State(app_state): State<AppState>,
    Json(payload): Json<BulkPreferencePayload>,
) -> Result<Json<UpdatedCount>, AppError> {
    payload.validate()?;

    let updated = app_state
        .notification_service
        .bulk_update_preferences(&payload.user_ids, payload.kind, payload.enabled)
        .await?;
    Ok(Json(UpdatedCount { updated }))
}

// =============================================================================
//  3. VISÃO GERAL
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/notification-settings/users",
    tag = "Notification Settings",
    responses((status = 200, description = "Usuários com contagem de assinaturas", body = Vec<UserNotificationSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserNotificationSummary>>, AppError> {
    Ok(Json(app_state.notification_service.list_users().await?))
}

#[utoipa::path(
    get,
    path = "/api/notification-settings/stats",
    tag = "Notification Settings",
    responses((status = 200, description = "Estatísticas", body = NotificationStats)),
    security(("api_jwt" = []))
)]
pub async fn stats(State(app_state): State<AppState>) -> Result<Json<NotificationStats>, AppError> {
    Ok(Json(app_state.notification_service.stats().await?))
}

// src/handlers/notifications.rs

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::notification::{Notification, NotificationInbox, NotificationSubscription},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Aceita o formato do `PushSubscription.toJSON()` (com `keys`)
/// ou as chaves soltas no corpo.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribePayload {
    #[validate(url(message = "Endpoint inválido."))]
    #[schema(example = "https://fcm.googleapis.com/fcm/send/abc123")]
    pub endpoint: String,
    pub keys: Option<SubscriptionKeys>,
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

impl SubscribePayload {
    fn into_parts(self) -> Result<(String, String, String), AppError> {
        let (p256dh, auth) = match self.keys {
            Some(keys) => (keys.p256dh, keys.auth),
            None => match (self.p256dh, self.auth) {
                (Some(p256dh), Some(auth)) => (p256dh, auth),
                _ => {
                    return Err(AppError::BadRequest(
                        "As chaves p256dh e auth são obrigatórias.".into(),
                    ))
                }
            },
        };

        if p256dh.trim().is_empty() || auth.trim().is_empty() {
            return Err(AppError::BadRequest("As chaves p256dh e auth são obrigatórias.".into()));
        }

        Ok((self.endpoint, p256dh, auth))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnsubscribePayload {
    #[validate(length(min = 1, message = "O endpoint é obrigatório."))]
    pub endpoint: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedCount {
    pub updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TestNotificationResponse {
    /// `false` quando o tipo SYSTEM está desligado para o usuário
    pub sent: bool,
    pub notification: Option<Notification>,
}

// =============================================================================
//  1. ASSINATURAS
// =============================================================================

#[utoipa::path(
    post,
    path = "/api/notifications/subscribe",
    tag = "Notifications",
    request_body = SubscribePayload,
    responses(
        (status = 201, description = "Assinatura registrada", body = NotificationSubscription),
        (status = 400, description = "Chaves ausentes ou endpoint fora de https público"),
        (status = 409, description = "Endpoint registrado por outro usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    headers: HeaderMap,
    Json(payload): Json<SubscribePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let (endpoint, p256dh, auth) = payload.into_parts()?;

    let subscription = app_state
        .notification_service
        .subscribe(user.id, &endpoint, &p256dh, &auth, user_agent.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

#[utoipa::path(
    post,
    path = "/api/notifications/unsubscribe",
    tag = "Notifications",
    request_body = UnsubscribePayload,
    responses(
        (status = 204, description = "Assinatura removida"),
        (status = 404, description = "Assinatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn unsubscribe(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UnsubscribePayload>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    app_state
        .notification_service
        .unsubscribe(user.id, &payload.endpoint)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/notifications/subscriptions",
    tag = "Notifications",
    responses((status = 200, description = "Assinaturas do usuário", body = Vec<NotificationSubscription>)),
    security(("api_jwt" = []))
)]
pub async fn list_subscriptions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<NotificationSubscription>>, AppError> {
    Ok(Json(app_state.notification_service.list_subscriptions(user.id).await?))
}

// =============================================================================
//  2. CAIXA DE ENTRADA
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, description = "Últimas 50 notificações", body = NotificationInbox)),
    security(("api_jwt" = []))
)]
pub async fn inbox(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<NotificationInbox>, AppError> {
    Ok(Json(app_state.notification_service.inbox(user.id).await?))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da notificação")),
    responses(
        (status = 200, description = "Notificação lida", body = Notification),
        (status = 404, description = "Notificação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_read(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(app_state.notification_service.mark_read(user.id, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    tag = "Notifications",
    responses((status = 200, description = "Quantidade marcada como lida", body = UpdatedCount)),
    security(("api_jwt" = []))
)]
pub async fn mark_all_read(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UpdatedCount>, AppError> {
    let updated = app_state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(UpdatedCount { updated }))
}

#[utoipa::path(
    post,
    path = "/api/notifications/test",
    tag = "Notifications",
    responses((status = 200, description = "Notificação de teste", body = TestNotificationResponse)),
    security(("api_jwt" = []))
)]
pub async fn send_test(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<TestNotificationResponse>, AppError> {
    let notification = app_state.notification_service.send_test(user.id).await?;
    Ok(Json(TestNotificationResponse {
        sent: notification.is_some(),
        notification,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> SubscribePayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn nested_keys_are_accepted() {
        let p = payload(serde_json::json!({
            "endpoint": "https://push.example.com/abc",
            "keys": { "p256dh": "BPk", "auth": "xyz" }
        }));
        let (endpoint, p256dh, auth) = p.into_parts().unwrap();
        assert_eq!(endpoint, "https://push.example.com/abc");
        assert_eq!(p256dh, "BPk");
        assert_eq!(auth, "xyz");
    }

    #[test]
    fn flat_keys_are_accepted() {
        let p = payload(serde_json::json!({
            "endpoint": "https://push.example.com/abc",
            "p256dh": "BPk",
            "auth": "xyz"
        }));
        assert!(p.into_parts().is_ok());
    }

    #[test]
    fn missing_keys_are_rejected() {
        let p = payload(serde_json::json!({ "endpoint": "https://push.example.com/abc" }));
        assert!(matches!(p.into_parts(), Err(AppError::BadRequest(_))));

        let blank = payload(serde_json::json!({
            "endpoint": "https://push.example.com/abc",
            "keys": { "p256dh": " ", "auth": "xyz" }
        }));
        assert!(matches!(blank.into_parts(), Err(AppError::BadRequest(_))));
    }
}

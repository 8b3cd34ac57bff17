// src/models/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE notification_type do banco.
// O mesmo tipo identifica a configuração global e a preferência de cada usuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    AppointmentReminder,
    QuoteUpdate,
    SupportUpdate,
    Payroll,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: NotificationType,
    #[schema(example = "Lembrete de agendamento")]
    pub title: String,
    #[schema(example = "Thor tem Banho e Tosa amanhã às 14:00.")]
    pub body: String,
    pub read_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInbox {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

// Assinatura Web Push de um navegador/dispositivo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    #[schema(example = "https://fcm.googleapis.com/fcm/send/abc123")]
    pub endpoint: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub p256dh: String,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub auth: String,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Configuração global por tipo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSetting {
    pub kind: NotificationType,
    pub enabled: bool,
    pub description: Option<String>,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

// Preferência de um usuário por tipo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreference {
    pub user_id: Uuid,
    pub kind: NotificationType,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem de usuários na tela de configurações
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserNotificationSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: crate::models::auth::Role,
    pub subscriptions: i64,
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTypeCount {
    pub kind: NotificationType,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    pub total: i64,
    pub unread: i64,
    pub subscriptions: i64,
    pub users_with_subscriptions: i64,
    pub by_type: Vec<NotificationTypeCount>,
}

// O que vai no corpo do push
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub notification_id: Uuid,
    pub kind: NotificationType,
    pub title: String,
    pub body: String,
}

// Resultado de uma execução do cron
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub processed: u32,
    pub sent: u32,
    pub skipped: u32,
    pub failed: u32,
}

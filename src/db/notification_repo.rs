// src/db/notification_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notification::{
        Notification, NotificationPreference, NotificationSetting, NotificationStats,
        NotificationSubscription, NotificationType, NotificationTypeCount,
        UserNotificationSummary,
    },
};

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, kind, title, body, read_at, delivered_at, created_at";
const SUBSCRIPTION_COLUMNS: &str = "id, user_id, endpoint, p256dh, auth, user_agent, created_at";

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CAIXA DE ENTRADA
    // =========================================================================

    pub async fn create(
        &self,
        user_id: Uuid,
        kind: NotificationType,
        title: &str,
        body: &str,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, kind, title, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(kind)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_delivered(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE notifications SET delivered_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn count_unread(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Marca como lida apenas se a notificação pertence ao usuário
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications SET read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND user_id = $2
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = NOW() WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  ASSINATURAS (WEB PUSH)
    // =========================================================================

    /// UPSERT pelo endpoint, restrito ao dono. Endpoint de outro usuário
    /// não é alterado e a função devolve `None`.
    pub async fn upsert_subscription(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
        user_agent: Option<&str>,
    ) -> Result<Option<NotificationSubscription>, AppError> {
        let subscription = sqlx::query_as::<_, NotificationSubscription>(&format!(
            r#"
            INSERT INTO notification_subscriptions (user_id, endpoint, p256dh, auth, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (endpoint)
            DO UPDATE SET
                p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                user_agent = EXCLUDED.user_agent
            WHERE notification_subscriptions.user_id = EXCLUDED.user_id
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(endpoint)
        .bind(p256dh)
        .bind(auth)
        .bind(user_agent)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subscription)
    }

    pub async fn delete_subscription(&self, user_id: Uuid, endpoint: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM notification_subscriptions WHERE user_id = $1 AND endpoint = $2",
        )
        .bind(user_id)
        .bind(endpoint)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove assinaturas que o provedor informou como expiradas
    pub async fn delete_subscriptions_by_id(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM notification_subscriptions WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list_subscriptions(&self, user_id: Uuid) -> Result<Vec<NotificationSubscription>, AppError> {
        let subscriptions = sqlx::query_as::<_, NotificationSubscription>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM notification_subscriptions WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subscriptions)
    }

    // =========================================================================
    //  CONFIGURAÇÕES GLOBAIS E PREFERÊNCIAS
    // =========================================================================

    pub async fn list_settings(&self) -> Result<Vec<NotificationSetting>, AppError> {
        let settings = sqlx::query_as::<_, NotificationSetting>(
            "SELECT kind, enabled, description, updated_by, updated_at FROM notification_settings ORDER BY kind",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn upsert_setting(
        &self,
        kind: NotificationType,
        enabled: bool,
        updated_by: Uuid,
    ) -> Result<NotificationSetting, AppError> {
        let setting = sqlx::query_as::<_, NotificationSetting>(
            r#"
            INSERT INTO notification_settings (kind, enabled, updated_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (kind)
            DO UPDATE SET
                enabled = EXCLUDED.enabled,
                updated_by = EXCLUDED.updated_by,
                updated_at = NOW()
            RETURNING kind, enabled, description, updated_by, updated_at
            "#,
        )
        .bind(kind)
        .bind(enabled)
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Sem linha de configuração o tipo é considerado ligado
    pub async fn is_globally_enabled(&self, kind: NotificationType) -> Result<bool, AppError> {
        let enabled: Option<bool> =
            sqlx::query_scalar("SELECT enabled FROM notification_settings WHERE kind = $1")
                .bind(kind)
                .fetch_optional(&self.pool)
                .await?;

        Ok(enabled.unwrap_or(true))
    }

    /// Sem preferência registrada o usuário recebe a notificação
    pub async fn is_enabled_for_user(&self, user_id: Uuid, kind: NotificationType) -> Result<bool, AppError> {
        let enabled: Option<bool> = sqlx::query_scalar(
            "SELECT enabled FROM notification_preferences WHERE user_id = $1 AND kind = $2",
        )
        .bind(user_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enabled.unwrap_or(true))
    }

    pub async fn list_preferences(&self, user_id: Uuid) -> Result<Vec<NotificationPreference>, AppError> {
        let preferences = sqlx::query_as::<_, NotificationPreference>(
            "SELECT user_id, kind, enabled, updated_at FROM notification_preferences WHERE user_id = $1 ORDER BY kind",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(preferences)
    }

    pub async fn upsert_preference(
        &self,
        user_id: Uuid,
        kind: NotificationType,
        enabled: bool,
    ) -> Result<NotificationPreference, AppError> {
        let preference = sqlx::query_as::<_, NotificationPreference>(
            r#"
            INSERT INTO notification_preferences (user_id, kind, enabled)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, kind)
            DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()
            RETURNING user_id, kind, enabled, updated_at
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(preference)
    }

    /// Aplica a mesma preferência para vários usuários de uma vez
    pub async fn bulk_upsert_preferences(
        &self,
        user_ids: &[Uuid],
        kind: NotificationType,
        enabled: bool,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO notification_preferences (user_id, kind, enabled)
            SELECT u.id, $2, $3 FROM users u
            WHERE u.id = ANY($1) AND u.deleted_at IS NULL
            ON CONFLICT (user_id, kind)
            DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()
            "#,
        )
        .bind(user_ids)
        .bind(kind)
        .bind(enabled)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  VISÕES ADMINISTRATIVAS
    // =========================================================================

    pub async fn list_user_summaries(&self) -> Result<Vec<UserNotificationSummary>, AppError> {
        let users = sqlx::query_as::<_, UserNotificationSummary>(
            r#"
            SELECT
                u.id, u.name, u.email, u.role,
                (SELECT COUNT(*) FROM notification_subscriptions s WHERE s.user_id = u.id) AS subscriptions,
                (SELECT COUNT(*) FROM notifications n WHERE n.user_id = u.id AND n.read_at IS NULL) AS unread
            FROM users u
            WHERE u.deleted_at IS NULL
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn stats(&self) -> Result<NotificationStats, AppError> {
        let (total, unread, subscriptions, users_with_subscriptions): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM notifications),
                    (SELECT COUNT(*) FROM notifications WHERE read_at IS NULL),
                    (SELECT COUNT(*) FROM notification_subscriptions),
                    (SELECT COUNT(DISTINCT user_id) FROM notification_subscriptions)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let by_type = sqlx::query_as::<_, NotificationTypeCount>(
            "SELECT kind, COUNT(*) AS count FROM notifications GROUP BY kind ORDER BY kind",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(NotificationStats {
            total,
            unread,
            subscriptions,
            users_with_subscriptions,
            by_type,
        })
    }
}

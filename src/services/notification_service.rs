// src/services/notification_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, UserRepository},
    models::notification::{
        Notification, NotificationInbox, NotificationPreference, NotificationSetting,
        NotificationStats, NotificationSubscription, NotificationType, PushPayload,
        UserNotificationSummary,
    },
    services::push::{deliver_to_subscriptions, validate_push_endpoint, PushSender},
};

const INBOX_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    user_repo: UserRepository,
    sender: Arc<dyn PushSender>,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, user_repo: UserRepository, sender: Arc<dyn PushSender>) -> Self {
        Self { repo, user_repo, sender }
    }

    // =========================================================================
    //  ENVIO
    // =========================================================================

    /// Grava e envia uma notificação. `Ok(None)` quando o tipo está desligado
    /// globalmente ou pelo usuário. Falhas de push são só registradas em log.
    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationType,
        title: &str,
        body: &str,
    ) -> Result<Option<Notification>, AppError> {
        if !self.repo.is_globally_enabled(kind).await? {
            tracing::debug!("Notificação {:?} desligada globalmente", kind);
            return Ok(None);
        }
        if !self.repo.is_enabled_for_user(user_id, kind).await? {
            tracing::debug!("Usuário {} desligou notificações {:?}", user_id, kind);
            return Ok(None);
        }

        let notification = self.repo.create(user_id, kind, title, body).await?;
        self.push(&notification).await;

        Ok(Some(notification))
    }

    async fn push(&self, notification: &Notification) {
        let subscriptions = match self.repo.list_subscriptions(notification.user_id).await {
            Ok(subs) => subs,
            Err(e) => {
                tracing::warn!("Falha ao carregar assinaturas de {}: {}", notification.user_id, e);
                return;
            }
        };
        if subscriptions.is_empty() {
            return;
        }

        let payload = PushPayload {
            notification_id: notification.id,
            kind: notification.kind,
            title: notification.title.clone(),
            body: notification.body.clone(),
        };
        let summary = deliver_to_subscriptions(self.sender.as_ref(), &subscriptions, &payload).await;

        if !summary.expired.is_empty() {
            match self.repo.delete_subscriptions_by_id(&summary.expired).await {
                Ok(removed) => tracing::info!("{} assinatura(s) expirada(s) removida(s)", removed),
                Err(e) => tracing::warn!("Falha ao remover assinaturas expiradas: {}", e),
            }
        }
        if summary.delivered > 0 {
            if let Err(e) = self.repo.mark_delivered(notification.id).await {
                tracing::warn!("Falha ao marcar notificação {} como entregue: {}", notification.id, e);
            }
        }
    }

    pub async fn send_test(&self, user_id: Uuid) -> Result<Option<Notification>, AppError> {
        self.notify(
            user_id,
            NotificationType::System,
            "Notificação de teste",
            "Se você está vendo esta mensagem, as notificações estão funcionando.",
        )
        .await
    }

    // =========================================================================
    //  CAIXA DE ENTRADA E ASSINATURAS
    // =========================================================================

    pub async fn inbox(&self, user_id: Uuid) -> Result<NotificationInbox, AppError> {
        let notifications = self.repo.list_for_user(user_id, INBOX_LIMIT).await?;
        let unread_count = self.repo.count_unread(user_id).await?;

        Ok(NotificationInbox { notifications, unread_count })
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<Notification, AppError> {
        self.repo
            .mark_read(id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notificação não encontrada.".into()))
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64, AppError> {
        self.repo.mark_all_read(user_id).await
    }

    pub async fn subscribe(
        &self,
        user_id: Uuid,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
        user_agent: Option<&str>,
    ) -> Result<NotificationSubscription, AppError> {
        validate_push_endpoint(endpoint)?;

        self.repo
            .upsert_subscription(user_id, endpoint, p256dh, auth, user_agent)
            .await?
            .ok_or_else(|| AppError::Conflict("Endpoint já registrado por outro usuário.".into()))
    }

    pub async fn unsubscribe(&self, user_id: Uuid, endpoint: &str) -> Result<(), AppError> {
        if !self.repo.delete_subscription(user_id, endpoint).await? {
            return Err(AppError::NotFound("Assinatura não encontrada.".into()));
        }
        Ok(())
    }

    pub async fn list_subscriptions(&self, user_id: Uuid) -> Result<Vec<NotificationSubscription>, AppError> {
        self.repo.list_subscriptions(user_id).await
    }

    // =========================================================================
    //  CONFIGURAÇÕES (MASTER)
    // =========================================================================

    pub async fn list_settings(&self) -> Result<Vec<NotificationSetting>, AppError> {
        self.repo.list_settings().await
    }

    pub async fn update_setting(
        &self,
        kind: NotificationType,
        enabled: bool,
        updated_by: Uuid,
    ) -> Result<NotificationSetting, AppError> {
        let setting = self.repo.upsert_setting(kind, enabled, updated_by).await?;
        tracing::info!("Notificação {:?} {} por {}", kind, if enabled { "ligada" } else { "desligada" }, updated_by);
        Ok(setting)
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))
    }

    pub async fn user_preferences(&self, user_id: Uuid) -> Result<Vec<NotificationPreference>, AppError> {
        self.ensure_user(user_id).await?;
        self.repo.list_preferences(user_id).await
    }

    pub async fn update_user_preference(
        &self,
        user_id: Uuid,
        kind: NotificationType,
        enabled: bool,
    ) -> Result<NotificationPreference, AppError> {
        self.ensure_user(user_id).await?;
        self.repo.upsert_preference(user_id, kind, enabled).await
    }

    pub async fn bulk_update_preferences(
        &self,
        user_ids: &[Uuid],
        kind: NotificationType,
        enabled: bool,
    ) -> Result<u64, AppError> {
        if user_ids.is_empty() {
            return Err(AppError::BadRequest("Informe ao menos um usuário.".into()));
        }
        self.repo.bulk_upsert_preferences(user_ids, kind, enabled).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserNotificationSummary>, AppError> {
        self.repo.list_user_summaries().await
    }

    pub async fn stats(&self) -> Result<NotificationStats, AppError> {
        self.repo.stats().await
    }
}

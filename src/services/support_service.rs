// src/services/support_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupportRepository,
    middleware::auth::AuthenticatedUser,
    models::{
        notification::NotificationType,
        support::{SupportTicket, TicketStatus},
    },
    services::notification_service::NotificationService,
};

#[derive(Clone)]
pub struct SupportService {
    repo: SupportRepository,
    notifications: NotificationService,
}

impl SupportService {
    pub fn new(repo: SupportRepository, notifications: NotificationService) -> Self {
        Self { repo, notifications }
    }

    pub async fn open_ticket(&self, user_id: Uuid, subject: &str, message: &str) -> Result<SupportTicket, AppError> {
        let ticket = self.repo.create(user_id, subject, message).await?;
        tracing::info!("Chamado {} aberto por {}", ticket.id, user_id);
        Ok(ticket)
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<SupportTicket>, AppError> {
        let scope = if actor.is_staff() { None } else { Some(actor.id) };
        self.repo.list(scope).await
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: TicketStatus,
    ) -> Result<SupportTicket, AppError> {
        let ticket = self.repo.update_status(id, status, actor.id).await?;

        let body = format!(
            "Seu chamado \"{}\" agora está {}.",
            ticket.subject,
            status.label()
        );
        if let Err(e) = self
            .notifications
            .notify(ticket.user_id, NotificationType::SupportUpdate, "Atualização do chamado", &body)
            .await
        {
            tracing::warn!("Falha ao notificar chamado {}: {}", ticket.id, e);
        }

        Ok(ticket)
    }
}

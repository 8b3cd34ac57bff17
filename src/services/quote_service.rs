// src/services/quote_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, recurrence::{calculate_recurrence_count, occurrence_dates}},
    db::{
        appointment_repo::NewAppointment, quote_repo::NewQuote, AppointmentRepository,
        CatalogRepository, CustomerRepository, QuoteRepository,
    },
    middleware::auth::AuthenticatedUser,
    models::{
        appointment::Appointment,
        customer::Customer,
        notification::NotificationType,
        quote::{NormalizationReport, Quote, QuoteStatus},
    },
    services::notification_service::NotificationService,
};

/// Total do orçamento: preço base multiplicado pelo número de ocorrências
pub fn quote_total(base_price: Decimal, is_recurring: bool) -> Decimal {
    base_price * Decimal::from(calculate_recurrence_count(is_recurring))
}

/// Preço de cada agendamento gerado a partir do orçamento
pub fn occurrence_price(total: Decimal, is_recurring: bool) -> Decimal {
    (total / Decimal::from(calculate_recurrence_count(is_recurring))).round_dp(2)
}

pub fn status_message(status: QuoteStatus) -> &'static str {
    match status {
        QuoteStatus::Solicitado => "Recebemos o seu pedido de orçamento.",
        QuoteStatus::EmAnalise => "Seu orçamento está em análise.",
        QuoteStatus::Enviado => "Seu orçamento foi enviado. Confira os valores.",
        QuoteStatus::Aprovado => "Seu orçamento foi aprovado.",
        QuoteStatus::Rejeitado => "Seu orçamento foi recusado.",
        QuoteStatus::Agendado => "Os horários do seu orçamento foram agendados.",
        QuoteStatus::Cancelado => "Seu orçamento foi cancelado.",
    }
}

pub struct QuoteRequest {
    pub customer_id: Option<Uuid>,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub is_recurring: bool,
    pub desired_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct QuoteService {
    repo: QuoteRepository,
    customer_repo: CustomerRepository,
    catalog_repo: CatalogRepository,
    appointment_repo: AppointmentRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl QuoteService {
    pub fn new(
        repo: QuoteRepository,
        customer_repo: CustomerRepository,
        catalog_repo: CatalogRepository,
        appointment_repo: AppointmentRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self { repo, customer_repo, catalog_repo, appointment_repo, notifications, pool }
    }

    async fn resolve_customer(
        &self,
        actor: &AuthenticatedUser,
        customer_id: Option<Uuid>,
    ) -> Result<Customer, AppError> {
        let customer = match (actor.is_staff(), customer_id) {
            (true, Some(id)) => self.customer_repo.find_by_id(id).await?,
            (true, None) => {
                return Err(AppError::BadRequest("Informe o cliente (customerId) do orçamento.".into()));
            }
            (false, _) => self.customer_repo.find_by_user(actor.id).await?,
        };

        customer.ok_or_else(|| AppError::NotFound("Cliente não encontrado.".into()))
    }

    pub async fn create(&self, actor: &AuthenticatedUser, request: QuoteRequest) -> Result<Quote, AppError> {
        let customer = self.resolve_customer(actor, request.customer_id).await?;
        if customer.blocked {
            return Err(AppError::Forbidden("Cliente bloqueado não pode solicitar orçamentos.".into()));
        }

        let pet = self
            .customer_repo
            .find_pet(request.pet_id)
            .await?
            .filter(|p| p.customer_id == customer.id)
            .ok_or_else(|| AppError::NotFound("Pet não encontrado.".into()))?;

        let service = self
            .catalog_repo
            .find_service(request.service_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Serviço não encontrado.".into()))?;

        let quote = self
            .repo
            .create(NewQuote {
                customer_id: customer.id,
                pet_id: pet.id,
                service_id: service.id,
                is_recurring: request.is_recurring,
                total: quote_total(service.base_price, request.is_recurring),
                desired_date: request.desired_date,
                notes: request.notes.as_deref(),
            })
            .await?;

        tracing::info!("Orçamento {} criado para o cliente {}", quote.id, customer.id);
        Ok(quote)
    }

    pub async fn list(&self, actor: &AuthenticatedUser) -> Result<Vec<Quote>, AppError> {
        if actor.is_staff() {
            return self.repo.list(None).await;
        }
        let customer = self.resolve_customer(actor, None).await?;
        self.repo.list(Some(customer.id)).await
    }

    /// Orçamento de outro cliente é tratado como inexistente
    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<Quote, AppError> {
        let quote = self
            .repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".into()))?;

        if !actor.is_staff() {
            let customer = self.resolve_customer(actor, None).await?;
            if quote.customer_id != customer.id {
                return Err(AppError::NotFound("Orçamento não encontrado.".into()));
            }
        }

        Ok(quote)
    }

    pub async fn update_status(&self, id: Uuid, status: QuoteStatus) -> Result<Quote, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".into()))?;

        if current.status.is_final() && current.status != status {
            return Err(AppError::Conflict(format!(
                "Orçamento {} não pode mudar de status.",
                current.status.as_str()
            )));
        }

        let quote = self.repo.update_status(&mut *tx, id, status).await?;
        tx.commit().await?;

        self.notify_customer(&quote).await;

        Ok(quote)
    }

    async fn notify_customer(&self, quote: &Quote) {
        let customer = match self.customer_repo.find_by_id(quote.customer_id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Falha ao buscar cliente do orçamento {}: {}", quote.id, e);
                return;
            }
        };

        if let Err(e) = self
            .notifications
            .notify(
                customer.user_id,
                NotificationType::QuoteUpdate,
                "Atualização do orçamento",
                status_message(quote.status),
            )
            .await
        {
            tracing::warn!("Falha ao notificar atualização do orçamento {}: {}", quote.id, e);
        }
    }

    /// Gera os agendamentos de um orçamento aprovado e marca como AGENDADO, tudo numa transação
    pub async fn schedule(
        &self,
        id: Uuid,
        first_date: DateTime<Utc>,
        staff_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Chamadas concorrentes esperam aqui; a segunda já lê AGENDADO
        let quote = self
            .repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Orçamento não encontrado.".into()))?;

        if quote.status != QuoteStatus::Aprovado {
            return Err(AppError::Conflict(
                "Apenas orçamentos aprovados podem ser agendados.".into(),
            ));
        }

        let price = occurrence_price(quote.total, quote.is_recurring);
        let mut appointments = Vec::new();

        for scheduled_at in occurrence_dates(first_date, quote.is_recurring) {
            let appointment = self
                .appointment_repo
                .create(
                    &mut *tx,
                    &NewAppointment {
                        customer_id: quote.customer_id,
                        pet_id: quote.pet_id,
                        service_id: quote.service_id,
                        quote_id: Some(quote.id),
                        staff_id,
                        scheduled_at,
                        price,
                    },
                )
                .await?;
            appointments.push(appointment);
        }

        let quote = self.repo.update_status(&mut *tx, quote.id, QuoteStatus::Agendado).await?;

        tx.commit().await?;

        tracing::info!("Orçamento {} gerou {} agendamento(s)", quote.id, appointments.len());
        self.notify_customer(&quote).await;

        Ok(appointments)
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let quote = self.get(actor, id).await?;
        self.repo.soft_delete(quote.id).await?;
        Ok(())
    }

    /// Reescreve o status antigo para o canônico. Idempotente.
    pub async fn normalize_statuses(&self) -> Result<NormalizationReport, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = self.repo.normalize_legacy_status(&mut *tx).await?;
        let remaining = self.repo.count_legacy_status(&mut *tx).await?;

        tx.commit().await?;

        tracing::info!("Padronização de status: {} orçamento(s) atualizado(s)", updated);
        Ok(NormalizationReport { updated, remaining })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurring_quote_costs_four_sessions() {
        let base = Decimal::new(8990, 2);
        assert_eq!(quote_total(base, false), base);
        assert_eq!(quote_total(base, true), Decimal::new(35960, 2));
    }

    #[test]
    fn occurrence_price_splits_total_evenly() {
        assert_eq!(occurrence_price(Decimal::new(35960, 2), true), Decimal::new(8990, 2));
        assert_eq!(occurrence_price(Decimal::new(8990, 2), false), Decimal::new(8990, 2));
    }
}

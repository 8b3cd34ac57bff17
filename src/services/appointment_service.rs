// src/services/appointment_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AppointmentRepository, CatalogRepository, CustomerRepository},
    middleware::auth::AuthenticatedUser,
    models::appointment::{
        Appointment, AppointmentStatus, AppointmentStatusChange, Invoice, InvoiceDocument,
        InvoiceStatus, PaymentMethod, PaymentReceipt,
    },
    services::document_service::DocumentService,
};

/// Fatura quitada quando a soma dos pagamentos alcança o total
pub fn is_settled(total: Decimal, paid: Decimal) -> bool {
    paid >= total
}

#[derive(Clone)]
pub struct AppointmentService {
    repo: AppointmentRepository,
    customer_repo: CustomerRepository,
    catalog_repo: CatalogRepository,
    documents: DocumentService,
    pool: PgPool,
}

impl AppointmentService {
    pub fn new(
        repo: AppointmentRepository,
        customer_repo: CustomerRepository,
        catalog_repo: CatalogRepository,
        documents: DocumentService,
        pool: PgPool,
    ) -> Self {
        Self { repo, customer_repo, catalog_repo, documents, pool }
    }

    /// `None` para a equipe (vê tudo); o id do cliente para os demais
    async fn customer_scope(&self, actor: &AuthenticatedUser) -> Result<Option<Uuid>, AppError> {
        if actor.is_staff() {
            return Ok(None);
        }
        let customer = self
            .customer_repo
            .find_by_user(actor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Perfil de cliente não encontrado.".into()))?;
        Ok(Some(customer.id))
    }

    // =========================================================================
    //  AGENDAMENTOS
    // =========================================================================

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Appointment>, AppError> {
        let scope = self.customer_scope(actor).await?;
        self.repo.list(scope, from, to).await
    }

    /// Agendamento encerrado não muda mais. FINALIZADO gera a fatura na mesma transação.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<AppointmentStatusChange, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Agendamento não encontrado.".into()))?;

        if current.status.is_closed() {
            return Err(AppError::Conflict(
                "Agendamento finalizado ou cancelado não pode mudar de status.".into(),
            ));
        }

        let appointment = self.repo.update_status(&mut *tx, id, status).await?;

        let invoice = if status == AppointmentStatus::Finalizado {
            let description = self
                .catalog_repo
                .find_service(appointment.service_id)
                .await?
                .map(|s| s.name)
                .unwrap_or_else(|| "Serviço".to_string());

            let invoice = self
                .repo
                .create_invoice(
                    &mut *tx,
                    appointment.customer_id,
                    Some(appointment.id),
                    appointment.quote_id,
                    appointment.price,
                )
                .await?;
            self.repo
                .add_invoice_line(&mut *tx, invoice.id, &description, 1, appointment.price)
                .await?;
            Some(invoice)
        } else {
            None
        };

        tx.commit().await?;

        if let Some(invoice) = &invoice {
            tracing::info!("Agendamento {} finalizado, fatura {} emitida", id, invoice.id);
        }

        Ok(AppointmentStatusChange { appointment, invoice })
    }

    // =========================================================================
    //  FATURAS E PAGAMENTOS
    // =========================================================================

    pub async fn list_invoices(&self, actor: &AuthenticatedUser) -> Result<Vec<Invoice>, AppError> {
        let scope = self.customer_scope(actor).await?;
        self.repo.list_invoices(scope).await
    }

    pub async fn invoice_pdf(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<Vec<u8>, AppError> {
        let invoice = self
            .repo
            .find_invoice(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura não encontrada.".into()))?;

        if let Some(customer_id) = self.customer_scope(actor).await? {
            if invoice.customer_id != customer_id {
                return Err(AppError::NotFound("Fatura não encontrada.".into()));
            }
        }

        let document = InvoiceDocument {
            customer_name: self.repo.customer_name(invoice.customer_id).await?,
            lines: self.repo.list_invoice_lines(invoice.id).await?,
            paid_total: self.repo.paid_total(&self.pool, invoice.id).await?,
            invoice,
        };

        // genpdf é síncrono e pesado
        let documents = self.documents.clone();
        tokio::task::spawn_blocking(move || documents.render_invoice(&document))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))?
    }

    pub async fn record_payment(
        &self,
        invoice_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        received_by: Uuid,
    ) -> Result<PaymentReceipt, AppError> {
        let mut tx = self.pool.begin().await?;

        let invoice = self
            .repo
            .find_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Fatura não encontrada.".into()))?;

        if invoice.status != InvoiceStatus::Pendente {
            return Err(AppError::Conflict("A fatura não aceita mais pagamentos.".into()));
        }

        let payment = self
            .repo
            .add_payment(&mut *tx, invoice.id, amount, method, received_by)
            .await?;
        let paid = self.repo.paid_total(&mut *tx, invoice.id).await?;

        let invoice = if is_settled(invoice.total, paid) {
            self.repo.set_invoice_status(&mut *tx, invoice.id, InvoiceStatus::Pago).await?
        } else {
            invoice
        };

        tx.commit().await?;

        Ok(PaymentReceipt { payment, invoice })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_settles_at_or_above_total() {
        let total = Decimal::new(15000, 2);
        assert!(!is_settled(total, Decimal::new(14999, 2)));
        assert!(is_settled(total, total));
        assert!(is_settled(total, Decimal::new(20000, 2)));
    }
}

// src/services/dispatch_service.rs

use std::future::Future;

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::{
    common::error::AppError,
    db::AppointmentRepository,
    models::{
        appointment::ReminderCandidate,
        notification::{DispatchReport, NotificationType},
    },
    services::notification_service::NotificationService,
};

const REMINDER_WINDOW_HOURS: i64 = 24;
// Horário de Brasília (sem horário de verão)
const LOCAL_OFFSET_SECONDS: i32 = -3 * 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Sent,
    Skipped,
}

/// Processa cada item isoladamente: um erro é registrado e contado,
/// e o processamento segue para o próximo.
pub async fn process_isolated<T, F, Fut>(items: Vec<T>, mut handle: F) -> DispatchReport
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<ItemOutcome, AppError>>,
{
    let mut report = DispatchReport::default();

    for item in items {
        report.processed += 1;
        match handle(item).await {
            Ok(ItemOutcome::Sent) => report.sent += 1,
            Ok(ItemOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                tracing::warn!("Falha ao processar item do cron: {}", e);
                report.failed += 1;
            }
        }
    }

    report
}

pub fn reminder_body(candidate: &ReminderCandidate) -> String {
    let local = match FixedOffset::east_opt(LOCAL_OFFSET_SECONDS) {
        Some(offset) => candidate.scheduled_at.with_timezone(&offset),
        None => candidate.scheduled_at.fixed_offset(),
    };

    format!(
        "{} tem {} agendado para {} às {}.",
        candidate.pet_name,
        candidate.service_name,
        local.format("%d/%m/%Y"),
        local.format("%H:%M"),
    )
}

#[derive(Clone)]
pub struct DispatchService {
    appointment_repo: AppointmentRepository,
    notifications: NotificationService,
}

impl DispatchService {
    pub fn new(appointment_repo: AppointmentRepository, notifications: NotificationService) -> Self {
        Self { appointment_repo, notifications }
    }

    /// Lembretes das próximas 24h. Erro ao reservar derruba a execução inteira;
    /// erro em um agendamento só conta como falha. A reserva acontece antes do
    /// envio, então execuções sobrepostas nunca repetem um lembrete.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<DispatchReport, AppError> {
        let until = now + Duration::hours(REMINDER_WINDOW_HOURS);
        let candidates = self.appointment_repo.claim_due_reminders(now, until).await?;

        tracing::info!("Cron de notificações: {} lembrete(s) pendente(s)", candidates.len());

        let report = process_isolated(candidates, |candidate| self.send_reminder(candidate)).await;

        tracing::info!(
            "Cron de notificações concluído: processados={} enviados={} ignorados={} falhas={}",
            report.processed,
            report.sent,
            report.skipped,
            report.failed
        );

        Ok(report)
    }

    async fn send_reminder(&self, candidate: ReminderCandidate) -> Result<ItemOutcome, AppError> {
        let sent = self
            .notifications
            .notify(
                candidate.user_id,
                NotificationType::AppointmentReminder,
                "Lembrete de agendamento",
                &reminder_body(&candidate),
            )
            .await?;

        // Já reservado: tipo desligado ou falha de envio não voltam para a fila
        Ok(if sent.is_some() { ItemOutcome::Sent } else { ItemOutcome::Skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[tokio::test]
    async fn failures_are_counted_and_processing_continues() {
        let items = vec![1, 2, 3, 4, 5];

        let report = process_isolated(items, |n| async move {
            match n {
                2 => Err(AppError::Upstream { status: 500, message: "falhou".into() }),
                4 => Ok(ItemOutcome::Skipped),
                _ => Ok(ItemOutcome::Sent),
            }
        })
        .await;

        assert_eq!(
            report,
            DispatchReport { processed: 5, sent: 3, skipped: 1, failed: 1 }
        );
    }

    #[tokio::test]
    async fn empty_batch_reports_zeroes() {
        let report = process_isolated(Vec::<u8>::new(), |_| async { Ok(ItemOutcome::Sent) }).await;
        assert_eq!(report, DispatchReport::default());
    }

    #[test]
    fn reminder_uses_brasilia_time() {
        let candidate = ReminderCandidate {
            appointment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            pet_name: "Thor".into(),
            service_name: "Banho e Tosa".into(),
            scheduled_at: Utc.with_ymd_and_hms(2025, 3, 10, 17, 30, 0).unwrap(),
        };

        assert_eq!(
            reminder_body(&candidate),
            "Thor tem Banho e Tosa agendado para 10/03/2025 às 14:30."
        );
    }
}

// src/services/hr_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{HrRepository, UserRepository},
    models::{
        auth::Role,
        hr::{ClosedPeriod, PayAdjustment, PayPeriod, PayPeriodStatus, PayStatement, Staff, StaffSummary, TimeEntry},
        notification::NotificationType,
    },
    services::notification_service::NotificationService,
};

// ---
// Cálculos puros da folha e do ponto
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTotals {
    pub gross: Decimal,
    pub adjustments_total: Decimal,
    pub net: Decimal,
}

/// Bruto = salário base; líquido = bruto + ajustes, nunca abaixo de zero
pub fn compute_statement(base_salary: Decimal, adjustments: &[Decimal]) -> StatementTotals {
    let adjustments_total: Decimal = adjustments.iter().copied().sum();
    let net = (base_salary + adjustments_total).max(Decimal::ZERO);

    StatementTotals { gross: base_salary, adjustments_total, net }
}

pub fn worked_minutes(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> i64 {
    (clock_out - clock_in).num_minutes().max(0)
}

#[derive(Clone)]
pub struct HrService {
    repo: HrRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl HrService {
    pub fn new(
        repo: HrRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self { repo, user_repo, notifications, pool }
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub async fn list_staff(&self) -> Result<Vec<StaffSummary>, AppError> {
        self.repo.list_staff().await
    }

    /// Promove um usuário existente a FUNCIONARIO e cria o perfil, numa transação.
    /// ADMIN e MASTER mantêm o papel atual.
    pub async fn hire(
        &self,
        user_id: Uuid,
        position: &str,
        base_salary: Decimal,
        hired_at: Option<NaiveDate>,
    ) -> Result<Staff, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))?;

        let mut tx = self.pool.begin().await?;

        if user.role == Role::Cliente {
            self.user_repo.update_role(&mut *tx, user.id, Role::Funcionario).await?;
        }
        let staff = self
            .repo
            .create_staff(&mut *tx, user.id, position, base_salary, hired_at)
            .await?;

        tx.commit().await?;

        tracing::info!("Usuário {} contratado como {}", user.id, position);
        Ok(staff)
    }

    async fn staff_of(&self, user_id: Uuid) -> Result<Staff, AppError> {
        self.repo
            .find_staff_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Perfil de funcionário não encontrado.".into()))
    }

    // =========================================================================
    //  PONTO
    // =========================================================================

    pub async fn clock_in(&self, user_id: Uuid) -> Result<TimeEntry, AppError> {
        let staff = self.staff_of(user_id).await?;
        if self.repo.find_open_entry(staff.id).await?.is_some() {
            return Err(AppError::Conflict("Já existe um registro de ponto aberto.".into()));
        }
        self.repo.clock_in(staff.id, Utc::now()).await
    }

    pub async fn clock_out(&self, user_id: Uuid) -> Result<TimeEntry, AppError> {
        let staff = self.staff_of(user_id).await?;
        let entry = self
            .repo
            .find_open_entry(staff.id)
            .await?
            .ok_or_else(|| AppError::Conflict("Nenhum registro de ponto aberto.".into()))?;

        let now = Utc::now();
        self.repo
            .close_entry(entry.id, now, worked_minutes(entry.clock_in, now))
            .await
    }

    pub async fn my_entries(&self, user_id: Uuid) -> Result<Vec<TimeEntry>, AppError> {
        let staff = self.staff_of(user_id).await?;
        self.repo.list_entries(Some(staff.id)).await
    }

    pub async fn all_entries(&self, staff_id: Option<Uuid>) -> Result<Vec<TimeEntry>, AppError> {
        self.repo.list_entries(staff_id).await
    }

    // =========================================================================
    //  FOLHA DE PAGAMENTO
    // =========================================================================

    pub async fn create_period(&self, starts_on: NaiveDate, ends_on: NaiveDate) -> Result<PayPeriod, AppError> {
        if ends_on < starts_on {
            return Err(AppError::BadRequest(
                "A data final do período deve ser posterior à inicial.".into(),
            ));
        }
        self.repo.create_period(starts_on, ends_on).await
    }

    pub async fn list_periods(&self) -> Result<Vec<PayPeriod>, AppError> {
        self.repo.list_periods().await
    }

    pub async fn add_adjustment(
        &self,
        period_id: Uuid,
        staff_id: Uuid,
        amount: Decimal,
        reason: &str,
    ) -> Result<PayAdjustment, AppError> {
        let period = self
            .repo
            .find_period(&self.pool, period_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Período não encontrado.".into()))?;

        if period.status != PayPeriodStatus::Aberto {
            return Err(AppError::Conflict("O período já está fechado.".into()));
        }

        self.repo.add_adjustment(period.id, staff_id, amount, reason).await
    }

    /// Gera um holerite por funcionário ativo e fecha o período, numa transação
    pub async fn close_period(&self, period_id: Uuid) -> Result<ClosedPeriod, AppError> {
        let mut tx = self.pool.begin().await?;

        let period = self
            .repo
            .find_period(&mut *tx, period_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Período não encontrado.".into()))?;

        if period.status != PayPeriodStatus::Aberto {
            return Err(AppError::Conflict("O período já está fechado.".into()));
        }

        let staff = self.repo.list_active_staff(&mut *tx).await?;
        let mut statements = Vec::with_capacity(staff.len());

        for member in &staff {
            let adjustments = self
                .repo
                .list_adjustment_amounts(&mut *tx, period.id, member.id)
                .await?;
            let minutes = self
                .repo
                .worked_minutes_in_period(&mut *tx, member.id, period.starts_on, period.ends_on)
                .await?;
            let totals = compute_statement(member.base_salary, &adjustments);

            let statement = self
                .repo
                .create_statement(
                    &mut *tx,
                    period.id,
                    member.id,
                    totals.gross,
                    totals.adjustments_total,
                    totals.net,
                    minutes,
                )
                .await?;
            statements.push(statement);
        }

        let period = self.repo.close_period(&mut *tx, period.id).await?;

        tx.commit().await?;

        tracing::info!("Período {} fechado com {} holerite(s)", period.id, statements.len());

        for member in &staff {
            if let Err(e) = self
                .notifications
                .notify(
                    member.user_id,
                    NotificationType::Payroll,
                    "Holerite disponível",
                    &format!(
                        "Seu holerite de {} a {} está disponível.",
                        period.starts_on.format("%d/%m/%Y"),
                        period.ends_on.format("%d/%m/%Y")
                    ),
                )
                .await
            {
                tracing::warn!("Falha ao notificar holerite de {}: {}", member.user_id, e);
            }
        }

        Ok(ClosedPeriod { period, statements })
    }

    pub async fn period_statements(&self, period_id: Uuid) -> Result<Vec<PayStatement>, AppError> {
        self.repo.list_statements_by_period(period_id).await
    }

    pub async fn my_statements(&self, user_id: Uuid) -> Result<Vec<PayStatement>, AppError> {
        let staff = self.staff_of(user_id).await?;
        self.repo.list_statements_by_staff(staff.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn statement_adds_bonuses_and_discounts() {
        let totals = compute_statement(
            Decimal::new(250000, 2),
            &[Decimal::new(30000, 2), Decimal::new(-5000, 2)],
        );

        assert_eq!(totals.gross, Decimal::new(250000, 2));
        assert_eq!(totals.adjustments_total, Decimal::new(25000, 2));
        assert_eq!(totals.net, Decimal::new(275000, 2));
    }

    #[test]
    fn net_never_goes_below_zero() {
        let totals = compute_statement(Decimal::new(100000, 2), &[Decimal::new(-150000, 2)]);
        assert_eq!(totals.net, Decimal::ZERO);
        assert_eq!(totals.adjustments_total, Decimal::new(-150000, 2));
    }

    #[test]
    fn no_adjustments_means_net_equals_gross() {
        let totals = compute_statement(Decimal::new(180000, 2), &[]);
        assert_eq!(totals.net, totals.gross);
        assert_eq!(totals.adjustments_total, Decimal::ZERO);
    }

    #[test]
    fn worked_minutes_is_never_negative() {
        let start = Utc::now();
        assert_eq!(worked_minutes(start, start + Duration::minutes(485)), 485);
        assert_eq!(worked_minutes(start, start - Duration::minutes(10)), 0);
    }
}

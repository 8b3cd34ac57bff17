// src/db/hr_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::hr::{PayAdjustment, PayPeriod, PayPeriodStatus, PayStatement, Staff, StaffSummary, TimeEntry},
};

const STAFF_COLUMNS: &str = "id, user_id, position, base_salary, hired_at, active, deleted_at, created_at";
const PERIOD_COLUMNS: &str = "id, starts_on, ends_on, status, closed_at, created_at";
const STATEMENT_COLUMNS: &str =
    "id, pay_period_id, staff_id, gross, adjustments_total, net, worked_minutes, created_at";
const ENTRY_COLUMNS: &str = "id, staff_id, clock_in, clock_out, worked_minutes";

#[derive(Clone)]
pub struct HrRepository {
    pool: PgPool,
}

impl HrRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FUNCIONÁRIOS
    // =========================================================================

    pub async fn create_staff<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        position: &str,
        base_salary: Decimal,
        hired_at: Option<NaiveDate>,
    ) -> Result<Staff, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Staff>(&format!(
            r#"
            INSERT INTO staff (user_id, position, base_salary, hired_at)
            VALUES ($1, $2, $3, COALESCE($4, CURRENT_DATE))
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(position)
        .bind(base_salary)
        .bind(hired_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Este usuário já possui perfil de funcionário."))
    }

    pub async fn find_staff_by_user(&self, user_id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE user_id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn list_staff(&self) -> Result<Vec<StaffSummary>, AppError> {
        let staff = sqlx::query_as::<_, StaffSummary>(
            r#"
            SELECT s.id, s.user_id, u.name, u.email, s.position, s.base_salary, s.active
            FROM staff s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.deleted_at IS NULL
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn list_active_staff<'e, E>(&self, executor: E) -> Result<Vec<Staff>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE active = TRUE AND deleted_at IS NULL"
        ))
        .fetch_all(executor)
        .await?;

        Ok(staff)
    }

    // =========================================================================
    //  PONTO
    // =========================================================================

    /// O índice parcial garante no máximo um registro aberto por funcionário
    pub async fn clock_in(&self, staff_id: Uuid, at: DateTime<Utc>) -> Result<TimeEntry, AppError> {
        sqlx::query_as::<_, TimeEntry>(&format!(
            "INSERT INTO time_entries (staff_id, clock_in) VALUES ($1, $2) RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(staff_id)
        .bind(at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um registro de ponto aberto."))
    }

    pub async fn find_open_entry(&self, staff_id: Uuid) -> Result<Option<TimeEntry>, AppError> {
        let entry = sqlx::query_as::<_, TimeEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries WHERE staff_id = $1 AND clock_out IS NULL"
        ))
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn close_entry(
        &self,
        id: Uuid,
        clock_out: DateTime<Utc>,
        worked_minutes: i64,
    ) -> Result<TimeEntry, AppError> {
        sqlx::query_as::<_, TimeEntry>(&format!(
            r#"
            UPDATE time_entries SET clock_out = $2, worked_minutes = $3
            WHERE id = $1 AND clock_out IS NULL
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(clock_out)
        .bind(worked_minutes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Conflict("Nenhum registro de ponto aberto.".into()))
    }

    /// `None` lista os registros de toda a equipe
    pub async fn list_entries(&self, staff_id: Option<Uuid>) -> Result<Vec<TimeEntry>, AppError> {
        let entries = sqlx::query_as::<_, TimeEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM time_entries
            WHERE ($1::uuid IS NULL OR staff_id = $1)
            ORDER BY clock_in DESC
            "#
        ))
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Minutos trabalhados em registros fechados dentro do período (datas inclusivas)
    pub async fn worked_minutes_in_period<'e, E>(
        &self,
        executor: E,
        staff_id: Uuid,
        starts_on: NaiveDate,
        ends_on: NaiveDate,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let minutes: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(worked_minutes), 0)::BIGINT FROM time_entries
            WHERE staff_id = $1
              AND clock_out IS NOT NULL
              AND clock_in::date BETWEEN $2 AND $3
            "#,
        )
        .bind(staff_id)
        .bind(starts_on)
        .bind(ends_on)
        .fetch_one(executor)
        .await?;

        Ok(minutes)
    }

    // =========================================================================
    //  FOLHA DE PAGAMENTO
    // =========================================================================

    pub async fn create_period(&self, starts_on: NaiveDate, ends_on: NaiveDate) -> Result<PayPeriod, AppError> {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            "INSERT INTO pay_periods (starts_on, ends_on) VALUES ($1, $2) RETURNING {PERIOD_COLUMNS}"
        ))
        .bind(starts_on)
        .bind(ends_on)
        .fetch_one(&self.pool)
        .await?;

        Ok(period)
    }

    pub async fn list_periods(&self) -> Result<Vec<PayPeriod>, AppError> {
        let periods = sqlx::query_as::<_, PayPeriod>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM pay_periods ORDER BY starts_on DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(periods)
    }

    /// Trava a linha do período até o fim da transação
    pub async fn find_period<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<PayPeriod>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            "SELECT {PERIOD_COLUMNS} FROM pay_periods WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(period)
    }

    pub async fn close_period<'e, E>(&self, executor: E, id: Uuid) -> Result<PayPeriod, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let period = sqlx::query_as::<_, PayPeriod>(&format!(
            r#"
            UPDATE pay_periods SET status = $2, closed_at = NOW()
            WHERE id = $1
            RETURNING {PERIOD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(PayPeriodStatus::Fechado)
        .fetch_one(executor)
        .await?;

        Ok(period)
    }

    pub async fn add_adjustment(
        &self,
        period_id: Uuid,
        staff_id: Uuid,
        amount: Decimal,
        reason: &str,
    ) -> Result<PayAdjustment, AppError> {
        let adjustment = sqlx::query_as::<_, PayAdjustment>(
            r#"
            INSERT INTO pay_adjustments (pay_period_id, staff_id, amount, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, pay_period_id, staff_id, amount, reason, created_at
            "#,
        )
        .bind(period_id)
        .bind(staff_id)
        .bind(amount)
        .bind(reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(adjustment)
    }

    pub async fn list_adjustment_amounts<'e, E>(
        &self,
        executor: E,
        period_id: Uuid,
        staff_id: Uuid,
    ) -> Result<Vec<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let amounts: Vec<Decimal> = sqlx::query_scalar(
            "SELECT amount FROM pay_adjustments WHERE pay_period_id = $1 AND staff_id = $2",
        )
        .bind(period_id)
        .bind(staff_id)
        .fetch_all(executor)
        .await?;

        Ok(amounts)
    }

    pub async fn create_statement<'e, E>(
        &self,
        executor: E,
        period_id: Uuid,
        staff_id: Uuid,
        gross: Decimal,
        adjustments_total: Decimal,
        net: Decimal,
        worked_minutes: i64,
    ) -> Result<PayStatement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PayStatement>(&format!(
            r#"
            INSERT INTO pay_statements (pay_period_id, staff_id, gross, adjustments_total, net, worked_minutes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {STATEMENT_COLUMNS}
            "#
        ))
        .bind(period_id)
        .bind(staff_id)
        .bind(gross)
        .bind(adjustments_total)
        .bind(net)
        .bind(worked_minutes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Holerite já gerado para este período."))
    }

    pub async fn list_statements_by_period(&self, period_id: Uuid) -> Result<Vec<PayStatement>, AppError> {
        let statements = sqlx::query_as::<_, PayStatement>(&format!(
            "SELECT {STATEMENT_COLUMNS} FROM pay_statements WHERE pay_period_id = $1 ORDER BY created_at"
        ))
        .bind(period_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(statements)
    }

    pub async fn list_statements_by_staff(&self, staff_id: Uuid) -> Result<Vec<PayStatement>, AppError> {
        let statements = sqlx::query_as::<_, PayStatement>(&format!(
            "SELECT {STATEMENT_COLUMNS} FROM pay_statements WHERE staff_id = $1 ORDER BY created_at DESC"
        ))
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(statements)
    }
}

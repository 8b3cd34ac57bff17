// src/db/appointment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::appointment::{
        Appointment, AppointmentStatus, Invoice, InvoiceLine, InvoiceStatus, Payment,
        PaymentMethod, ReminderCandidate,
    },
};

const APPOINTMENT_COLUMNS: &str = "id, customer_id, pet_id, service_id, quote_id, staff_id, \
     scheduled_at, status, price, notes, reminder_sent_at, deleted_at, created_at, updated_at";
const INVOICE_COLUMNS: &str =
    "id, customer_id, appointment_id, quote_id, total, status, issued_at, paid_at";

pub struct NewAppointment {
    pub customer_id: Uuid,
    pub pet_id: Uuid,
    pub service_id: Uuid,
    pub quote_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub price: Decimal,
}

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  AGENDAMENTOS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointments (customer_id, pet_id, service_id, quote_id, staff_id, scheduled_at, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(appointment.customer_id)
        .bind(appointment.pet_id)
        .bind(appointment.service_id)
        .bind(appointment.quote_id)
        .bind(appointment.staff_id)
        .bind(appointment.scheduled_at)
        .bind(appointment.price)
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Appointment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(appointment)
    }

    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Appointment>, AppError> {
        let appointments = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT {APPOINTMENT_COLUMNS} FROM appointments
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::timestamptz IS NULL OR scheduled_at >= $2)
              AND ($3::timestamptz IS NULL OR scheduled_at < $3)
            ORDER BY scheduled_at ASC
            "#
        ))
        .bind(customer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointments SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::NotFound("Agendamento não encontrado.".into()))
    }

    // =========================================================================
    //  LEMBRETES (CRON)
    // =========================================================================

    /// Reserva os agendamentos ativos entre `from` e `until` que ainda não
    /// receberam lembrete, marcando `reminder_sent_at` no mesmo comando.
    /// Linhas travadas por outra execução são puladas, então cada
    /// agendamento é devolvido a uma única chamada.
    pub async fn claim_due_reminders(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<ReminderCandidate>, AppError> {
        let candidates = sqlx::query_as::<_, ReminderCandidate>(
            r#"
            WITH claimed AS (
                UPDATE appointments
                SET reminder_sent_at = NOW()
                WHERE id IN (
                    SELECT id FROM appointments
                    WHERE deleted_at IS NULL
                      AND reminder_sent_at IS NULL
                      AND status IN ('AGENDADO', 'CONFIRMADO')
                      AND scheduled_at >= $1
                      AND scheduled_at < $2
                    FOR UPDATE SKIP LOCKED
                )
                  AND reminder_sent_at IS NULL
                RETURNING id, customer_id, pet_id, service_id, scheduled_at
            )
            SELECT
                a.id AS appointment_id,
                c.user_id,
                p.name AS pet_name,
                s.name AS service_name,
                a.scheduled_at
            FROM claimed a
            INNER JOIN customers c ON c.id = a.customer_id
            INNER JOIN pets p ON p.id = a.pet_id
            INNER JOIN services s ON s.id = a.service_id
            ORDER BY a.scheduled_at ASC
            "#,
        )
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        appointment_id: Option<Uuid>,
        quote_id: Option<Uuid>,
        total: Decimal,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices (customer_id, appointment_id, quote_id, total)
            VALUES ($1, $2, $3, $4)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(appointment_id)
        .bind(quote_id)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn add_invoice_line<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<InvoiceLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, InvoiceLine>(
            r#"
            INSERT INTO invoice_lines (invoice_id, description, quantity, unit_price, total)
            VALUES ($1, $2, $3, $4, $4 * $3)
            RETURNING id, invoice_id, description, quantity, unit_price, total
            "#,
        )
        .bind(invoice_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;

        Ok(line)
    }

    pub async fn list_invoices(&self, customer_id: Option<Uuid>) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS} FROM invoices
            WHERE ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY issued_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    pub async fn find_invoice<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn list_invoice_lines(&self, invoice_id: Uuid) -> Result<Vec<InvoiceLine>, AppError> {
        let lines = sqlx::query_as::<_, InvoiceLine>(
            r#"
            SELECT id, invoice_id, description, quantity, unit_price, total
            FROM invoice_lines WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn customer_name(&self, customer_id: Uuid) -> Result<String, AppError> {
        let name: Option<String> = sqlx::query_scalar(
            "SELECT u.name FROM customers c INNER JOIN users u ON u.id = c.user_id WHERE c.id = $1",
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(name.unwrap_or_else(|| "Cliente".to_string()))
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn paid_total<'e, E>(&self, executor: E, invoice_id: Uuid) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn add_payment<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        received_by: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (invoice_id, amount, method, received_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, invoice_id, amount, method, received_by, paid_at
            "#,
        )
        .bind(invoice_id)
        .bind(amount)
        .bind(method)
        .bind(received_by)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn set_invoice_status<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        status: InvoiceStatus,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = $2,
                paid_at = CASE WHEN $2 = 'PAGO'::invoice_status THEN NOW() ELSE paid_at END
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(invoice)
    }
}

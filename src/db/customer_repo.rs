// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customer::{Customer, CustomerSummary, NewPet, Pet},
};

const CUSTOMER_COLUMNS: &str =
    "id, user_id, phone, document_number, address, blocked, deleted_at, created_at, updated_at";

const PET_COLUMNS: &str = "id, customer_id, name, species, breed, size, birth_date, notes, \
     photo_url, deleted_at, created_at, updated_at";

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        phone: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO customers (user_id, phone) VALUES ($1, $2) RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(phone)
        .fetch_one(executor)
        .await?;

        Ok(customer)
    }

    /// Perfil ativo do cliente ligado ao usuário
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE user_id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn list_active(&self) -> Result<Vec<CustomerSummary>, AppError> {
        let customers = sqlx::query_as::<_, CustomerSummary>(
            r#"
            SELECT
                c.id, c.user_id, u.name, u.email, c.phone, c.blocked,
                (SELECT COUNT(*) FROM pets p WHERE p.customer_id = c.id AND p.deleted_at IS NULL) AS pet_count,
                c.created_at
            FROM customers c
            INNER JOIN users u ON u.id = c.user_id
            WHERE c.deleted_at IS NULL
            ORDER BY u.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn set_blocked(&self, id: Uuid, blocked: bool) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers SET blocked = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente não encontrado.".into()))
    }

    /// Soft delete: marca deleted_at, nunca remove a linha
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE customers SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PETS
    // =========================================================================

    pub async fn create_pet(&self, customer_id: Uuid, pet: &NewPet) -> Result<Pet, AppError> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            r#"
            INSERT INTO pets (customer_id, name, species, breed, size, birth_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(&pet.breed)
        .bind(&pet.size)
        .bind(pet.birth_date)
        .bind(&pet.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(pet)
    }

    pub async fn find_pet(&self, id: Uuid) -> Result<Option<Pet>, AppError> {
        let pet = sqlx::query_as::<_, Pet>(&format!(
            "SELECT {PET_COLUMNS} FROM pets WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pet)
    }

    /// Lista pets ativos; `None` lista todos (uso da equipe)
    pub async fn list_pets(&self, customer_id: Option<Uuid>) -> Result<Vec<Pet>, AppError> {
        let pets = sqlx::query_as::<_, Pet>(&format!(
            r#"
            SELECT {PET_COLUMNS} FROM pets
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR customer_id = $1)
            ORDER BY name ASC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(pets)
    }

    pub async fn update_pet_photo(&self, id: Uuid, photo_url: &str) -> Result<Pet, AppError> {
        sqlx::query_as::<_, Pet>(&format!(
            r#"
            UPDATE pets SET photo_url = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {PET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(photo_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet não encontrado.".into()))
    }

    pub async fn soft_delete_pet(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE pets SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

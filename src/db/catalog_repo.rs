// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::catalog::{Product, ServiceItem, ServicePackage},
};

const SERVICE_COLUMNS: &str =
    "id, name, description, base_price, duration_minutes, deleted_at, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, name, description, base_price, deleted_at, created_at, updated_at";
const PACKAGE_COLUMNS: &str =
    "id, service_id, name, description, sessions, price, deleted_at, created_at";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- SERVIÇOS ---

    pub async fn list_services(&self) -> Result<Vec<ServiceItem>, AppError> {
        let services = sqlx::query_as::<_, ServiceItem>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE deleted_at IS NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    pub async fn find_service(&self, id: Uuid) -> Result<Option<ServiceItem>, AppError> {
        let service = sqlx::query_as::<_, ServiceItem>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn create_service(
        &self,
        name: &str,
        description: Option<&str>,
        base_price: Decimal,
        duration_minutes: i32,
    ) -> Result<ServiceItem, AppError> {
        let service = sqlx::query_as::<_, ServiceItem>(&format!(
            r#"
            INSERT INTO services (name, description, base_price, duration_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(base_price)
        .bind(duration_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    // --- PRODUTOS ---

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE deleted_at IS NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
        base_price: Decimal,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, base_price)
            VALUES ($1, $2, $3)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(base_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(product)
    }

    // --- PACOTES ---

    pub async fn list_packages(&self) -> Result<Vec<ServicePackage>, AppError> {
        let packages = sqlx::query_as::<_, ServicePackage>(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM service_packages WHERE deleted_at IS NULL ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    pub async fn create_package(
        &self,
        service_id: Uuid,
        name: &str,
        description: Option<&str>,
        sessions: i32,
        price: Decimal,
    ) -> Result<ServicePackage, AppError> {
        sqlx::query_as::<_, ServicePackage>(&format!(
            r#"
            INSERT INTO service_packages (service_id, name, description, sessions, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PACKAGE_COLUMNS}
            "#
        ))
        .bind(service_id)
        .bind(name)
        .bind(description)
        .bind(sessions)
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("O pacote '{}' já existe.", name)))
    }

    pub async fn soft_delete_package(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE service_packages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// src/services/catalog_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Product, ServiceItem, ServicePackage},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    pub async fn list_services(&self) -> Result<Vec<ServiceItem>, AppError> {
        self.repo.list_services().await
    }

    pub async fn find_service(&self, id: Uuid) -> Result<ServiceItem, AppError> {
        self.repo
            .find_service(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Serviço não encontrado.".into()))
    }

    pub async fn create_service(
        &self,
        name: &str,
        description: Option<&str>,
        base_price: Decimal,
        duration_minutes: i32,
    ) -> Result<ServiceItem, AppError> {
        self.repo
            .create_service(name, description, base_price, duration_minutes)
            .await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.repo.list_products().await
    }

    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
        base_price: Decimal,
    ) -> Result<Product, AppError> {
        self.repo.create_product(name, description, base_price).await
    }

    pub async fn list_packages(&self) -> Result<Vec<ServicePackage>, AppError> {
        self.repo.list_packages().await
    }

    // O pacote precisa apontar para um serviço ativo
    pub async fn create_package(
        &self,
        service_id: Uuid,
        name: &str,
        description: Option<&str>,
        sessions: i32,
        price: Decimal,
    ) -> Result<ServicePackage, AppError> {
        self.find_service(service_id).await?;
        self.repo
            .create_package(service_id, name, description, sessions, price)
            .await
    }

    pub async fn delete_package(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_package(id).await? {
            return Err(AppError::NotFound("Pacote não encontrado.".into()));
        }
        Ok(())
    }
}

// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_negative},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Management, RequireRole},
    },
    models::catalog::{Product, ServiceItem, ServicePackage},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Banho e Tosa")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 89.90)]
    pub base_price: Decimal,

    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 minuto."))]
    #[schema(example = 90)]
    pub duration_minutes: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Shampoo Neutro 500ml")]
    pub name: String,

    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 39.90)]
    pub base_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackagePayload {
    pub service_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Pacote Mensal de Banhos")]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "O pacote deve ter pelo menos 1 sessão."))]
    #[schema(example = 4)]
    pub sessions: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64, example = 299.90)]
    pub price: Decimal,
}

// =============================================================================
//  SERVIÇOS E PRODUTOS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/catalog/services",
    tag = "Catalog",
    responses((status = 200, description = "Serviços ativos", body = Vec<ServiceItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<ServiceItem>>, AppError> {
    Ok(Json(app_state.catalog_service.list_services().await?))
}

#[utoipa::path(
    post,
    path = "/api/catalog/services",
    tag = "Catalog",
    request_body = CreateServicePayload,
    responses((status = 201, description = "Serviço criado", body = ServiceItem)),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = app_state
        .catalog_service
        .create_service(
            payload.name.trim(),
            payload.description.as_deref(),
            payload.base_price,
            payload.duration_minutes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

#[utoipa::path(
    get,
    path = "/api/catalog/products",
    tag = "Catalog",
    responses((status = 200, description = "Produtos ativos", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.catalog_service.list_products().await?))
}

#[utoipa::path(
    post,
    path = "/api/catalog/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado", body = Product)),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .create_product(payload.name.trim(), payload.description.as_deref(), payload.base_price)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// =============================================================================
//  PACOTES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/packages",
    tag = "Packages",
    responses((status = 200, description = "Pacotes ativos", body = Vec<ServicePackage>)),
    security(("api_jwt" = []))
)]
pub async fn list_packages(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<ServicePackage>>, AppError> {
    Ok(Json(app_state.catalog_service.list_packages().await?))
}

#[utoipa::path(
    post,
    path = "/api/packages",
    tag = "Packages",
    request_body = CreatePackagePayload,
    responses(
        (status = 201, description = "Pacote criado", body = ServicePackage),
        (status = 404, description = "Serviço não encontrado"),
        (status = 409, description = "Pacote já existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_package(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Json(payload): Json<CreatePackagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let package = app_state
        .catalog_service
        .create_package(
            payload.service_id,
            payload.name.trim(),
            payload.description.as_deref(),
            payload.sessions,
            payload.price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(package)))
}

#[utoipa::path(
    delete,
    path = "/api/packages/{id}",
    tag = "Packages",
    params(("id" = Uuid, Path, description = "ID do pacote")),
    responses(
        (status = 204, description = "Pacote removido"),
        (status = 404, description = "Pacote não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_package(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_package(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

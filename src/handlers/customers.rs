// src/handlers/customers.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Management, MasterOnly, RequireRole, Staff},
    },
    models::customer::{Customer, CustomerSummary, NewPet, Pet, PhotoUploadResponse},
    services::storage::is_allowed_photo_type,
};

// Limite do upload de foto (5 MB)
const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

// =============================================================================
//  1. CLIENTES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Clientes ativos", body = Vec<CustomerSummary>),
        (status = 403, description = "Apenas equipe")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _guard: RequireRole<Staff>,
) -> Result<Json<Vec<CustomerSummary>>, AppError> {
    let customers = app_state.customer_service.list_customers().await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/customers/me",
    tag = "Customers",
    responses(
        (status = 200, description = "Perfil do cliente autenticado", body = Customer),
        (status = 404, description = "Usuário sem perfil de cliente")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_profile(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_service.my_profile(user.id).await?;
    Ok(Json(customer))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockCustomerPayload {
    #[schema(example = true)]
    pub blocked: bool,
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}/block",
    tag = "Customers",
    request_body = BlockCustomerPayload,
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_blocked(
    State(app_state): State<AppState>,
    _guard: RequireRole<Management>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BlockCustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_service.set_blocked(id, payload.blocked).await?;
    Ok(Json(customer))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido (soft delete)"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    _guard: RequireRole<MasterOnly>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.customer_service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  2. PETS
// =============================================================================

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PetFilter {
    /// Filtra por cliente (apenas equipe)
    pub customer_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/pets",
    tag = "Pets",
    params(PetFilter),
    responses((status = 200, description = "Pets visíveis ao usuário", body = Vec<Pet>)),
    security(("api_jwt" = []))
)]
pub async fn list_pets(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<PetFilter>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let pets = app_state.customer_service.list_pets(&user, filter.customer_id).await?;
    Ok(Json(pets))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetPayload {
    /// Obrigatório quando quem cadastra é da equipe
    pub customer_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O nome do pet é obrigatório."))]
    #[schema(example = "Thor")]
    pub name: String,

    #[validate(length(min = 1, message = "A espécie é obrigatória."))]
    #[schema(example = "Cachorro")]
    pub species: String,

    #[schema(example = "Golden Retriever")]
    pub breed: Option<String>,

    #[schema(example = "GRANDE")]
    pub size: Option<String>,

    #[schema(value_type = Option<String>, format = Date, example = "2021-06-15")]
    pub birth_date: Option<NaiveDate>,

    pub notes: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/pets",
    tag = "Pets",
    request_body = CreatePetPayload,
    responses(
        (status = 201, description = "Pet cadastrado", body = Pet),
        (status = 403, description = "Cliente bloqueado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_pet(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let pet = NewPet {
        name: payload.name.trim().to_string(),
        species: payload.species.trim().to_string(),
        breed: payload.breed,
        size: payload.size,
        birth_date: payload.birth_date,
        notes: payload.notes,
    };

    let created = app_state
        .customer_service
        .create_pet(&user, payload.customer_id, pet)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/api/pets/{id}",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "ID do pet")),
    responses(
        (status = 204, description = "Pet removido (soft delete)"),
        (status = 404, description = "Pet não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_pet(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.customer_service.delete_pet(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Upload multipart: campo "file"
#[utoipa::path(
    post,
    path = "/api/pets/{id}/photo",
    tag = "Pets",
    params(("id" = Uuid, Path, description = "ID do pet")),
    request_body(content_type = "multipart/form-data", description = "Campo `file` com a imagem"),
    responses(
        (status = 200, description = "Foto enviada", body = PhotoUploadResponse),
        (status = 400, description = "Arquivo ausente, vazio, acima de 5 MB ou fora de JPEG/PNG/WebP/GIF"),
        (status = 502, description = "Falha do Storage"),
        (status = 503, description = "Storage não configurado")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_pet_photo(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<PhotoUploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart inválido: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if !is_allowed_photo_type(&content_type) {
            return Err(AppError::BadRequest(
                "A imagem deve ser JPEG, PNG, WebP ou GIF.".into(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Falha ao ler o arquivo: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("O arquivo está vazio.".into()));
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(AppError::BadRequest("A imagem deve ter no máximo 5 MB.".into()));
        }

        let response = app_state
            .customer_service
            .upload_pet_photo(&user, id, file_name.as_deref(), &content_type, bytes.to_vec())
            .await?;

        return Ok(Json(response));
    }

    Err(AppError::BadRequest("Envie a imagem no campo 'file'.".into()))
}

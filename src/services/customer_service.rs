// src/services/customer_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    middleware::auth::AuthenticatedUser,
    models::customer::{Customer, CustomerSummary, NewPet, Pet, PhotoUploadResponse},
    services::storage::{file_extension, StorageClient},
};

pub const PET_PHOTO_BUCKET: &str = "pets";

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    storage: StorageClient,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, storage: StorageClient) -> Self {
        Self { repo, storage }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_customers(&self) -> Result<Vec<CustomerSummary>, AppError> {
        self.repo.list_active().await
    }

    /// Perfil de cliente do próprio usuário
    pub async fn my_profile(&self, user_id: Uuid) -> Result<Customer, AppError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Perfil de cliente não encontrado.".into()))
    }

    pub async fn set_blocked(&self, customer_id: Uuid, blocked: bool) -> Result<Customer, AppError> {
        let customer = self.repo.set_blocked(customer_id, blocked).await?;
        tracing::info!("Cliente {} {}", customer_id, if blocked { "bloqueado" } else { "desbloqueado" });
        Ok(customer)
    }

    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(customer_id).await? {
            return Err(AppError::NotFound("Cliente não encontrado.".into()));
        }
        Ok(())
    }

    // =========================================================================
    //  PETS
    // =========================================================================

    /// Cliente só enxerga os próprios pets. A equipe pode filtrar por cliente.
    pub async fn list_pets(
        &self,
        actor: &AuthenticatedUser,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<Pet>, AppError> {
        if actor.is_staff() {
            return self.repo.list_pets(customer_id).await;
        }

        let customer = self.my_profile(actor.id).await?;
        self.repo.list_pets(Some(customer.id)).await
    }

    pub async fn create_pet(
        &self,
        actor: &AuthenticatedUser,
        customer_id: Option<Uuid>,
        pet: NewPet,
    ) -> Result<Pet, AppError> {
        let customer = if actor.is_staff() {
            let customer_id = customer_id.ok_or_else(|| {
                AppError::BadRequest("Informe o cliente (customerId) do pet.".into())
            })?;
            self.repo
                .find_by_id(customer_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Cliente não encontrado.".into()))?
        } else {
            self.my_profile(actor.id).await?
        };

        if customer.blocked {
            return Err(AppError::Forbidden(
                "Cliente bloqueado não pode cadastrar pets.".into(),
            ));
        }

        self.repo.create_pet(customer.id, &pet).await
    }

    /// Pet visível para o ator: dono ou equipe. Pet de outro cliente vira 404.
    async fn accessible_pet(&self, actor: &AuthenticatedUser, pet_id: Uuid) -> Result<Pet, AppError> {
        let pet = self
            .repo
            .find_pet(pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pet não encontrado.".into()))?;

        if !actor.is_staff() {
            let customer = self.my_profile(actor.id).await?;
            if pet.customer_id != customer.id {
                return Err(AppError::NotFound("Pet não encontrado.".into()));
            }
        }

        Ok(pet)
    }

    pub async fn delete_pet(&self, actor: &AuthenticatedUser, pet_id: Uuid) -> Result<(), AppError> {
        let pet = self.accessible_pet(actor, pet_id).await?;
        self.repo.soft_delete_pet(pet.id).await?;
        Ok(())
    }

    pub async fn upload_pet_photo(
        &self,
        actor: &AuthenticatedUser,
        pet_id: Uuid,
        file_name: Option<&str>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<PhotoUploadResponse, AppError> {
        let pet = self.accessible_pet(actor, pet_id).await?;

        let path = format!(
            "{}/{}.{}",
            pet.id,
            Uuid::new_v4(),
            file_extension(file_name, content_type)
        );

        let stored_path = self
            .storage
            .upload(PET_PHOTO_BUCKET, &path, bytes, content_type)
            .await?;
        let photo_url = self.storage.public_url(PET_PHOTO_BUCKET, &stored_path)?;

        self.repo.update_pet_photo(pet.id, &photo_url).await?;

        Ok(PhotoUploadResponse { pet_id: pet.id, photo_url })
    }
}

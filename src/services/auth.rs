// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, UserRepository},
    models::auth::{Claims, Role, User},
};

const TOKEN_TTL_DAYS: i64 = 7;

// ---
// Emissão e verificação de JWT (HS256), sem consulta ao banco
// ---
#[derive(Clone)]
pub struct TokenService {
    jwt_secret: String,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn issue(&self, user_id: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Valida assinatura e expiração. Qualquer falha vira `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    customer_repo: CustomerRepository,
    tokens: TokenService,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        customer_repo: CustomerRepository,
        tokens: TokenService,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, customer_repo, tokens, pool }
    }

    /// Cria o usuário CLIENTE e o perfil de cliente na mesma transação
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<String, AppError> {
        // Hashing fora da transação: não toca no banco
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, name, email, &hashed_password, Role::Cliente)
            .await?;

        self.customer_repo
            .create_customer(&mut *tx, new_user.id, phone)
            .await?;

        tx.commit().await?;

        tracing::info!("Novo cliente registrado: {}", new_user.id);

        self.tokens.issue(new_user.id, new_user.role)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Só depois da senha conferir, para não revelar contas existentes
        if !user.can_login() {
            return Err(AppError::AccountDisabled);
        }

        self.tokens.issue(user.id, user.role)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuário não encontrado.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_subject_and_role() {
        let tokens = TokenService::new("segredo-de-teste".into());
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id, Role::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_DAYS * 24 * 3600) as usize);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new("segredo-a".into());
        let verifier = TokenService::new("segredo-b".into());

        let token = issuer.issue(Uuid::new_v4(), Role::Cliente).unwrap();

        assert!(matches!(verifier.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "segredo-de-teste";
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            role: Role::Master,
            exp: (now - Duration::hours(1)).timestamp() as usize,
            iat: (now - Duration::days(8)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap();

        let tokens = TokenService::new(secret.into());
        assert!(matches!(tokens.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let tokens = TokenService::new("segredo".into());
        assert!(matches!(tokens.verify("nao.e.jwt"), Err(AppError::InvalidToken)));
    }
}

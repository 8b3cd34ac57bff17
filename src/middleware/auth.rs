// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{common::error::AppError, config::AppState, models::auth::Role};

/// Identidade extraída do token. Não consulta o banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

// O middleware em si: sem token válido o handler nunca roda
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, axum_extra::typed_header::TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;

    let claims = app_state.token_service.verify(bearer.token())?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AppError::InvalidToken)
    }
}

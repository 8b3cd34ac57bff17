// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, middleware::auth::AuthenticatedUser, models::auth::Role};

/// Resultado da checagem de papel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(String),
}

/// Igualdade exata de papel. Não existe hierarquia implícita.
pub fn authorize(identity: &AuthenticatedUser, required: Role) -> Access {
    if identity.role == required {
        Access::Allowed
    } else {
        Access::Denied(format!(
            "Acesso negado: esta ação exige o papel {}.",
            required
        ))
    }
}

pub fn authorize_any(identity: &AuthenticatedUser, allowed: &[Role]) -> Access {
    if allowed.contains(&identity.role) {
        return Access::Allowed;
    }

    let names = allowed.iter().map(Role::as_str).collect::<Vec<_>>().join(", ");
    Access::Denied(format!(
        "Acesso negado: esta ação exige um dos papéis: {}.",
        names
    ))
}

/// Grupo de rotas exclusivo do MASTER. Roda depois do `auth_guard`.
pub async fn master_guard(request: Request, next: Next) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<AuthenticatedUser>()
        .copied()
        .ok_or(AppError::InvalidToken)?;

    match authorize(&identity, Role::Master) {
        Access::Allowed => Ok(next.run(request).await),
        Access::Denied(message) => {
            tracing::warn!("Usuário {} ({}) barrado em rota MASTER", identity.id, identity.role);
            Err(AppError::Forbidden(message))
        }
    }
}

// ---
// Guardião por handler
// ---

/// O conjunto de papéis aceito por um guardião
pub trait RoleRequirement: Send + Sync + 'static {
    fn allowed() -> &'static [Role];
}

/// Extrator que barra o handler quando o papel não está na lista de `T`
pub struct RequireRole<T>(pub AuthenticatedUser, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn identity(&self) -> &AuthenticatedUser {
        &self.0
    }
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = AuthenticatedUser::from_request_parts(parts, state).await?;

        match authorize_any(&identity, T::allowed()) {
            Access::Allowed => Ok(RequireRole(identity, PhantomData)),
            Access::Denied(message) => Err(AppError::Forbidden(message)),
        }
    }
}

// ---
// DEFINIÇÃO DOS GRUPOS (TIPOS)
// ---

pub struct Staff;
impl RoleRequirement for Staff {
    fn allowed() -> &'static [Role] {
        &[Role::Funcionario, Role::Admin, Role::Master]
    }
}

pub struct Management;
impl RoleRequirement for Management {
    fn allowed() -> &'static [Role] {
        &[Role::Admin, Role::Master]
    }
}

pub struct MasterOnly;
impl RoleRequirement for MasterOnly {
    fn allowed() -> &'static [Role] {
        &[Role::Master]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> AuthenticatedUser {
        AuthenticatedUser { id: Uuid::new_v4(), role }
    }

    #[test]
    fn only_exact_role_is_allowed() {
        assert_eq!(authorize(&identity(Role::Master), Role::Master), Access::Allowed);

        for role in [Role::Cliente, Role::Funcionario, Role::Admin] {
            match authorize(&identity(role), Role::Master) {
                Access::Denied(message) => assert!(message.contains("MASTER")),
                Access::Allowed => panic!("{} não deveria passar", role),
            }
        }
    }

    #[test]
    fn requirement_groups_match_expected_roles() {
        assert_eq!(authorize_any(&identity(Role::Funcionario), Staff::allowed()), Access::Allowed);
        assert!(matches!(
            authorize_any(&identity(Role::Cliente), Staff::allowed()),
            Access::Denied(_)
        ));
        assert!(matches!(
            authorize_any(&identity(Role::Funcionario), Management::allowed()),
            Access::Denied(_)
        ));
        assert_eq!(authorize_any(&identity(Role::Admin), Management::allowed()), Access::Allowed);
        assert!(matches!(
            authorize_any(&identity(Role::Admin), MasterOnly::allowed()),
            Access::Denied(_)
        ));
    }

    #[tokio::test]
    async fn extractor_rejects_missing_identity_with_401() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();

        let result = RequireRole::<Staff>::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn extractor_rejects_wrong_role_with_403() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(identity(Role::Funcionario));

        let result = RequireRole::<Management>::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}

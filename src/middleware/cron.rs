// src/middleware/cron.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use subtle::ConstantTimeEq;

use crate::{common::error::AppError, config::AppState};

/// Comparação em tempo constante do segredo compartilhado
pub fn secret_matches(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

// Sem segredo configurado o endpoint fica indisponível (503), nunca aberto
pub async fn cron_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = app_state
        .config
        .cron_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::ServiceUnavailable("CRON_SECRET não configurado.".into()))?;

    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;

    if !secret_matches(expected, bearer.token()) {
        tracing::warn!("Chamada ao cron com segredo inválido");
        return Err(AppError::InvalidToken);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_comparison() {
        assert!(secret_matches("segredo", "segredo"));
        assert!(!secret_matches("segredo", "segredO"));
        assert!(!secret_matches("segredo", "segredo-longo"));
        assert!(!secret_matches("segredo", ""));
    }
}

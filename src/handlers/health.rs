// src/handlers/health.rs

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{AppState, Config};

// Cada flag indica apenas se a configuração está presente
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    pub database: bool,
    pub jwt: bool,
    pub supabase: bool,
    pub openai: bool,
    pub cron: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "2025-03-10T14:30:00Z")]
    pub timestamp: String,
    #[schema(example = "production")]
    pub environment: String,
    pub checks: HealthChecks,
}

impl HealthChecks {
    pub fn from_config(config: &Config) -> Self {
        Self {
            database: !config.database_url.is_empty(),
            jwt: !config.jwt_secret.is_empty(),
            supabase: config.supabase_url.is_some() && config.supabase_service_role_key.is_some(),
            openai: config.openai_api_key.is_some(),
            cron: config.cron_secret.is_some(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Serviço no ar", body = HealthResponse)
    )
)]
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: app_state.config.environment.clone(),
        checks: HealthChecks::from_config(&app_state.config),
    })
}

// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AppointmentRepository, CatalogRepository, CustomerRepository, HrRepository,
        NotificationRepository, QuoteRepository, SupportRepository, UserRepository,
    },
    services::{
        appointment_service::AppointmentService,
        auth::{AuthService, TokenService},
        catalog_service::CatalogService,
        completion::{CompletionClient, OpenAiClient},
        customer_service::CustomerService,
        dispatch_service::DispatchService,
        document_service::DocumentService,
        hr_service::HrService,
        notification_service::NotificationService,
        push::{PushSender, WebPushSender},
        quote_service::QuoteService,
        storage::StorageClient,
        support_service::SupportService,
    },
};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub environment: String,
    pub port: u16,
    pub supabase_url: Option<String>,
    pub supabase_service_role_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub cron_secret: Option<String>,
    pub fonts_dir: String,
    pub pix_key: Option<String>,
    pub vapid_private_key: Option<String>,
    pub vapid_subject: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = optional_var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = optional_var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let port = match optional_var("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("PORT inválida: {}", raw))?,
            None => 3000,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            environment: optional_var("NODE_ENV").unwrap_or_else(|| "development".to_string()),
            port,
            supabase_url: optional_var("SUPABASE_URL"),
            supabase_service_role_key: optional_var("SUPABASE_SERVICE_ROLE_KEY"),
            openai_api_key: optional_var("OPENAI_API_KEY"),
            openai_model: optional_var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            cron_secret: optional_var("CRON_SECRET"),
            fonts_dir: optional_var("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()),
            pix_key: optional_var("PIX_KEY"),
            vapid_private_key: optional_var("VAPID_PRIVATE_KEY"),
            vapid_subject: optional_var("VAPID_SUBJECT"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub token_service: TokenService,
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub catalog_service: CatalogService,
    pub quote_service: QuoteService,
    pub appointment_service: AppointmentService,
    pub notification_service: NotificationService,
    pub dispatch_service: DispatchService,
    pub support_service: SupportService,
    pub hr_service: HrService,
    pub completion_client: Arc<dyn CompletionClient>,
    pub storage: StorageClient,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(config, db_pool))
    }

    /// Monta o gráfico de dependências sobre um pool já criado
    pub fn with_pool(config: Config, db_pool: PgPool) -> Self {
        let http = reqwest::Client::new();

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());
        let appointment_repo = AppointmentRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());
        let support_repo = SupportRepository::new(db_pool.clone());
        let hr_repo = HrRepository::new(db_pool.clone());

        // --- Adaptadores externos ---
        let storage = StorageClient::new(
            http.clone(),
            config.supabase_url.clone(),
            config.supabase_service_role_key.clone(),
        );
        let completion_client: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(
            http,
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        ));
        let push_sender: Arc<dyn PushSender> = Arc::new(WebPushSender::new(
            config.vapid_private_key.clone(),
            config.vapid_subject.clone(),
        ));

        // --- Serviços ---
        let token_service = TokenService::new(config.jwt_secret.clone());
        let notification_service =
            NotificationService::new(notification_repo, user_repo.clone(), push_sender);
        let documents = DocumentService::new(config.fonts_dir.clone(), config.pix_key.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            customer_repo.clone(),
            token_service.clone(),
            db_pool.clone(),
        );
        let customer_service = CustomerService::new(customer_repo.clone(), storage.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let quote_service = QuoteService::new(
            quote_repo,
            customer_repo.clone(),
            catalog_repo.clone(),
            appointment_repo.clone(),
            notification_service.clone(),
            db_pool.clone(),
        );
        let appointment_service = AppointmentService::new(
            appointment_repo.clone(),
            customer_repo,
            catalog_repo,
            documents,
            db_pool.clone(),
        );
        let dispatch_service = DispatchService::new(appointment_repo, notification_service.clone());
        let support_service = SupportService::new(support_repo, notification_service.clone());
        let hr_service = HrService::new(hr_repo, user_repo, notification_service.clone(), db_pool.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            token_service,
            auth_service,
            customer_service,
            catalog_service,
            quote_service,
            appointment_service,
            notification_service,
            dispatch_service,
            support_service,
            hr_service,
            completion_client,
            storage,
        }
    }
}

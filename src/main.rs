//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sevenpet_backend::config::{AppState, Config};
use sevenpet_backend::routes::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let port = config.port;
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let db_pool = app_state.db_pool.clone();
    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // O pool pertence ao processo: fecha antes de sair
    db_pool.close().await;
    tracing::info!("Servidor encerrado.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {}", e);
    }
    tracing::info!("Sinal de encerramento recebido, finalizando requisições...");
}

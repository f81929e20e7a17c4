use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::app::{app, AppState};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::store::{CredentialStore, PgCredentialStore};

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    info!("Starting {} in {:?} mode", config.project_name, config.environment);

    let database = DatabaseManager::connect_lazy(&config.database)?;
    let store: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(database.pool()));
    let state = AppState::from_config(&config, store)?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("{} listening on http://{}", config.project_name, bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

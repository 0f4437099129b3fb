use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use userapp_api::{create_router, AppState};
use userapp_configuration::{create_pool, ServerOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = ServerOptions::parse();

    let pool = create_pool(&options.database_url, &options.pool_settings)
        .await
        .context("could not connect to the database")?;
    if options.pool_settings.is_default() {
        tracing::info!("connected to the database");
    } else {
        tracing::info!(pool_settings = ?options.pool_settings, "connected to the database with custom pool settings");
    }

    let state = AppState::new(pool)?;
    let router = create_router(state);

    let address = options.address();
    tracing::info!(%address, "starting server");
    axum::Server::bind(&address)
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

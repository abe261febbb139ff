//! whiskey-server: whiskey catalog service
//!
//! REST backend for a personal spirits catalog:
//! - CRUD over whiskey records (PostgreSQL)
//! - Category / keyword filtering with pagination
//! - Local image attachments served under `/images`

mod api;
mod config;
mod db;
mod error;
mod logger;
mod services;
mod state;
mod validation;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(config.log_dir.as_deref())?;

    tracing::info!(
        env = %config.environment,
        upload_dir = %config.upload_dir.display(),
        "Starting whiskey-server"
    );

    let state = AppState::new(&config).await?;
    let app = api::create_router(state, config.max_upload_bytes);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("whiskey-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("whiskey-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

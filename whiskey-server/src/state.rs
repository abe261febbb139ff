//! Application state for whiskey-server

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::db::{PgWhiskeyRepository, WhiskeyRepository};
use crate::services::{ImageStore, WhiskeyService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub whiskeys: WhiskeyService,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and wire the services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let images = ImageStore::new(&config.upload_dir);
        tokio::fs::create_dir_all(images.root()).await?;

        Ok(Self::with_repository(
            Arc::new(PgWhiskeyRepository::new(pool)),
            images,
        ))
    }

    pub fn with_repository(repo: Arc<dyn WhiskeyRepository>, images: ImageStore) -> Self {
        Self {
            whiskeys: WhiskeyService::new(repo, images),
        }
    }
}

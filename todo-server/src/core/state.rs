use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::{Config, Result, ServerError};
use crate::db::DbService;

/// State shared by every request handler
///
/// Cheap to clone: the pool and config are reference counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
}

impl ServerState {
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    /// Open the database named by the config and run migrations
    pub async fn initialize(config: &Config) -> Result<Self> {
        let opened = if config.is_in_memory() {
            DbService::in_memory().await
        } else {
            if let Some(dir) = config.database_dir() {
                std::fs::create_dir_all(&dir)?;
            }
            DbService::new(&config.database_url).await
        };
        let db = opened.map_err(ServerError::Database)?;

        tracing::info!(
            environment = %config.environment,
            database = %config.database_url,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db.pool))
    }
}

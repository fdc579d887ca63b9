//! Application State
//!
//! Shared state passed to every command handler.

use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tokio::sync::Mutex as TokioMutex;

use crate::config::Config;
use crate::db;
use crate::error::CommandError;
use crate::reference::SharedTables;

/// Application state holding the current tables and the database pool
pub struct AppState {
    pub tables: Arc<SharedTables>,
    pub db: Arc<TokioMutex<Option<Pool<Sqlite>>>>,
    pub config: Config,
}

impl AppState {
    /// State with empty tables and no database
    pub fn new(config: Config) -> Self {
        Self {
            tables: Arc::new(SharedTables::default()),
            db: Arc::new(TokioMutex::new(None)),
            config,
        }
    }

    /// State backed by an already open pool
    pub fn with_pool(config: Config, pool: Pool<Sqlite>) -> Self {
        Self {
            db: Arc::new(TokioMutex::new(Some(pool))),
            ..Self::new(config)
        }
    }

    /// Open the configured database and load any stored tables
    pub async fn open(config: Config) -> Result<Self, CommandError> {
        let pool = db::init_db(&config.db_path).await?;

        let state = Self::new(config);
        if db::has_tables(&pool).await? {
            state.tables.replace(db::load_tables(&pool).await?);
        } else {
            log::warn!("No stored tables; run a seed before decoding");
        }
        *state.db.lock().await = Some(pool);

        Ok(state)
    }

    /// Database pool, if one is open
    pub async fn pool(&self) -> Result<Pool<Sqlite>, CommandError> {
        let db_guard = self.db.lock().await;
        db_guard.clone().ok_or(CommandError::NoDatabase)
    }
}

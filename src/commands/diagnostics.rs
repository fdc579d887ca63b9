//! Diagnostic commands
//!
//! This module provides:
//! - is_db_ready: Whether a database is open
//! - get_db_stats: Stored row counts and reference data version

use super::state::AppState;
use crate::db::{self, DbStats};
use crate::error::CommandError;

pub async fn is_db_ready(state: &AppState) -> bool {
    state.db.lock().await.is_some()
}

/// Row counts of the stored reference data
pub async fn get_db_stats(state: &AppState) -> Result<DbStats, CommandError> {
    let pool = state.pool().await?;
    Ok(db::get_db_stats(&pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::init::memory_db;

    #[tokio::test]
    async fn test_stats_on_fresh_database() {
        let state = AppState::with_pool(Config::default(), memory_db().await);
        assert!(is_db_ready(&state).await);
        let stats = get_db_stats(&state).await.unwrap();
        assert_eq!(stats.country_code_count, 0);
    }

    #[tokio::test]
    async fn test_stats_without_database() {
        let state = AppState::new(Config::default());
        assert!(!is_db_ready(&state).await);
        assert!(matches!(get_db_stats(&state).await, Err(CommandError::NoDatabase)));
    }
}

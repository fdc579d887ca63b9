// Database initialization and migration handling
use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};

use crate::db::migrations::MIGRATION_001;
use crate::error::StoreError;

/// Open (creating if needed) the database file and bring the schema up to date
pub async fn init_db(db_path: &Path) -> Result<Pool<Sqlite>, StoreError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Connect(sqlx::Error::Io(e)))?;
    }
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    log::info!("Initializing database at: {}", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .map_err(StoreError::Connect)?;

    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await
        .map_err(StoreError::query("enable WAL mode"))?;

    run_migrations(&pool).await?;

    log::info!("Database initialization complete");

    Ok(pool)
}

/// Run all pending migrations
pub(crate) async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(StoreError::query("create migrations table"))?;

    let applied: bool = sqlx::query(
        "SELECT COUNT(*) as count FROM _migrations WHERE name = 'migration_001'",
    )
    .fetch_one(pool)
    .await
    .map(|row| row.get::<i64, _>("count") > 0)
    .map_err(StoreError::query("check applied migrations"))?;

    if applied {
        return Ok(());
    }

    log::info!("Applying migration_001...");

    // SQLite runs one statement per query
    for stmt in statements(MIGRATION_001) {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|source| StoreError::Migration { statement: stmt.to_string(), source })?;
    }

    sqlx::query(
        "INSERT INTO _migrations (name, applied_at) VALUES ('migration_001', datetime('now'))",
    )
    .execute(pool)
    .await
    .map_err(StoreError::query("record migration"))?;

    log::info!("Migration 001 applied successfully");
    Ok(())
}

/// Split a migration into statements, dropping leading comment lines
fn statements(migration: &str) -> impl Iterator<Item = &str> {
    migration.split(';').filter_map(|statement| {
        let mut stmt = statement.trim();
        while stmt.starts_with("--") {
            stmt = match stmt.find('\n') {
                Some(idx) => stmt[idx + 1..].trim(),
                None => "",
            };
        }
        (!stmt.is_empty()).then_some(stmt)
    })
}

/// Single-connection in-memory database with the schema applied
#[cfg(test)]
pub(crate) async fn memory_db() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_skip_comments() {
        let sql = "-- header\n-- more\nCREATE TABLE a (x);\n\n-- trailing\n";
        let stmts: Vec<&str> = statements(sql).collect();
        assert_eq!(stmts, vec!["CREATE TABLE a (x)"]);
    }

    #[test]
    fn test_migration_splits_into_statements() {
        let stmts: Vec<&str> = statements(MIGRATION_001).collect();
        assert!(stmts.iter().all(|s| s.starts_with("CREATE")));
        assert_eq!(stmts.iter().filter(|s| s.starts_with("CREATE TABLE")).count(), 7);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = memory_db().await;
        run_migrations(&pool).await.unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM _migrations")
            .fetch_one(&pool)
            .await
            .map(|row| row.get("count"))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_init_db_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vin.db");
        let pool = init_db(&path).await.unwrap();
        assert!(path.exists());
        pool.close().await;
    }
}

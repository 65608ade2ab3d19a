//! Database initialization
//!
//! Creates the database file and the `assessment_results` table on first run.
//! Safe to call on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// How long a connection waits on a locked database before failing
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Connection options apply to every pooled connection, not just the first.
    // WAL lets the polling reads proceed while a webhook write is in flight.
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(BUSY_TIMEOUT),
        )
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_results_table(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// Every pooled connection to `sqlite::memory:` would see its own empty
/// database, so the pool is capped at one connection.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    create_results_table(&pool).await?;

    Ok(pool)
}

/// Create the assessment results table
///
/// Structured fields are stored as JSON text and decoded on read.
pub async fn create_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessment_results (
            response_id TEXT PRIMARY KEY,
            total_score REAL NOT NULL,
            mastery_level TEXT NOT NULL,
            dimension_scores TEXT NOT NULL,
            recommendations TEXT NOT NULL,
            raw_scores TEXT NOT NULL DEFAULT '[]',
            user_name TEXT NOT NULL DEFAULT '',
            user_email TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

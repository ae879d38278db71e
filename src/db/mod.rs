pub mod observation_queries;

use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::AppConfig;

/// Opens the process-wide pool. Called once at startup; the pool is closed on shutdown.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    info!("Opening SQLite database at {:?}", config.database_path);

    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(sqlx::Error::Io)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal) // readers never block the writer
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(options)
        .await
}

/// Single-connection in-memory database. Every connection to `:memory:` is a separate
/// database, so the pool must never open a second one or drop the first.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options: SqliteConnectOptions = "sqlite::memory:".parse()?;

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

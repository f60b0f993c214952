//! Durable download history.
//!
//! One append-only SQLite table, created on first use. Rows are never
//! mutated or deleted here; concurrent appends rely on SQLite's own locking.
//! Reads are not guaranteed to see appends still in flight.

use std::path::Path;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

/// Storage format for the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors produced by the history store.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One completed download, as recorded.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HistoryRecord {
    pub url: String,
    pub filename: String,
    pub filepath: String,
    pub timestamp: String,
}

/// Append/query handle for the download history database.
pub struct History {
    pool: SqlitePool,
}

impl History {
    /// Opens (or creates) the database at `path` and ensures the schema.
    ///
    /// The parent directory is created if absent.
    pub async fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS downloads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                filename TEXT NOT NULL,
                filepath TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        tracing::debug!(db = %path.display(), "history database ready");
        Ok(Self { pool })
    }

    /// Appends one completed-download row.
    pub async fn record(
        &self,
        url: &str,
        filename: &str,
        filepath: &Path,
        completed_at: DateTime<Utc>,
    ) -> Result<(), HistoryError> {
        sqlx::query("INSERT INTO downloads (url, filename, filepath, timestamp) VALUES (?, ?, ?, ?)")
            .bind(url)
            .bind(filename)
            .bind(filepath.to_string_lossy().as_ref())
            .bind(completed_at.format(TIMESTAMP_FORMAT).to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns all records, most recent first.
    ///
    /// The insertion id breaks ties between rows recorded within the same
    /// second, keeping the order strictly reverse-chronological.
    pub async fn list(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let rows = sqlx::query_as::<_, HistoryRecord>(
            "SELECT url, filename, filepath, timestamp FROM downloads
             ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

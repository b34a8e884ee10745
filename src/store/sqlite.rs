use super::{RecordKey, RecordStore, StoreFuture, StoredRecord};
use crate::error::StoreError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use std::path::Path;

const RECORDS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS daily_records (
    user_id    TEXT NOT NULL,
    date       TEXT NOT NULL,
    kind       TEXT NOT NULL,
    payload    TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, date, kind)
)";

/// SQLite-backed record store using a sqlx pool.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    /// Open (or create) the database file at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create store directory")?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&url)
            .await
            .context("open SQLite database")?;
        Self::with_pool(pool).await
    }

    /// Open an in-memory database (useful for tests).
    #[cfg(test)]
    pub async fn in_memory() -> anyhow::Result<Self> {
        // Each in-memory connection is its own database.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory SQLite")?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(RECORDS_TABLE)
            .execute(&pool)
            .await
            .context("create daily_records table")?;
        Ok(Self { pool })
    }
}

impl RecordStore for SqliteRecordStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn upsert<'a>(&'a self, key: &'a RecordKey, payload: Value) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::to_string(&payload)?;
            sqlx::query(
                "INSERT INTO daily_records (user_id, date, kind, payload, updated_at)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (user_id, date, kind)
                 DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            )
            .bind(&key.user_id)
            .bind(key.date.to_string())
            .bind(&key.kind)
            .bind(body)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;
            Ok(())
        })
    }

    fn select<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, Option<StoredRecord>> {
        Box::pin(async move {
            let row: Option<(String, String)> = sqlx::query_as(
                "SELECT payload, updated_at FROM daily_records
                 WHERE user_id = $1 AND date = $2 AND kind = $3",
            )
            .bind(&key.user_id)
            .bind(key.date.to_string())
            .bind(&key.kind)
            .fetch_optional(&self.pool)
            .await?;

            let Some((payload, updated_at)) = row else {
                return Ok(None);
            };
            let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                .map_err(|e| StoreError::BackendUnavailable(format!("bad timestamp: {e}")))?
                .with_timezone(&Utc);
            Ok(Some(StoredRecord {
                payload: serde_json::from_str(&payload)?,
                updated_at,
            }))
        })
    }

    fn delete<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let result = sqlx::query(
                "DELETE FROM daily_records WHERE user_id = $1 AND date = $2 AND kind = $3",
            )
            .bind(&key.user_id)
            .bind(key.date.to_string())
            .bind(&key.kind)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
    }
}

//! Per-user daily records: the day's state, the quest set it produced, and
//! cached script variants. Last write wins per `(user, date, kind)`.

mod memory;
mod sqlite;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::content::ScenarioType;
use crate::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

pub const DAILY_STATE_KIND: &str = "daily_state";
pub const QUEST_SET_KIND: &str = "quest_set";

/// Record kind for the cached variant set of one scenario.
pub fn scripts_kind(scenario: ScenarioType) -> String {
    format!("scripts:{scenario}")
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub user_id: String,
    pub date: NaiveDate,
    pub kind: String,
}

impl RecordKey {
    pub fn new(user_id: &str, date: NaiveDate, kind: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            date,
            kind: kind.to_string(),
        }
    }

    /// Key for `kind` under today's UTC date.
    pub fn today(user_id: &str, kind: &str) -> Self {
        Self::new(user_id, Utc::now().date_naive(), kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub payload: Value,
    pub updated_at: DateTime<Utc>,
}

type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Async record persistence contract.
pub trait RecordStore: Send + Sync {
    fn name(&self) -> &str;

    /// Insert or replace the record at `key`.
    fn upsert<'a>(&'a self, key: &'a RecordKey, payload: Value) -> StoreFuture<'a, ()>;

    fn select<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, Option<StoredRecord>>;

    /// Returns whether a record was removed.
    fn delete<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, bool>;
}

/// Serialize `value` and upsert it.
pub async fn put_json<T: Serialize + Sync>(
    store: &dyn RecordStore,
    key: &RecordKey,
    value: &T,
) -> Result<(), StoreError> {
    let payload = serde_json::to_value(value)?;
    store.upsert(key, payload).await
}

/// Persistence disabled: writes are accepted and dropped.
pub struct NoneRecordStore;

impl RecordStore for NoneRecordStore {
    fn name(&self) -> &str {
        "none"
    }

    fn upsert<'a>(&'a self, _key: &'a RecordKey, _payload: Value) -> StoreFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    fn select<'a>(&'a self, _key: &'a RecordKey) -> StoreFuture<'a, Option<StoredRecord>> {
        Box::pin(async { Ok(None) })
    }

    fn delete<'a>(&'a self, _key: &'a RecordKey) -> StoreFuture<'a, bool> {
        Box::pin(async { Ok(false) })
    }
}

pub async fn create_store(
    config: &StoreConfig,
    data_dir: &Path,
) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.backend {
        StoreBackend::Memory => Arc::new(InMemoryRecordStore::new()),
        StoreBackend::Sqlite => {
            let path = config
                .path
                .clone()
                .unwrap_or_else(|| data_dir.join("records.db"));
            Arc::new(SqliteRecordStore::open(&path).await?)
        }
        StoreBackend::None => Arc::new(NoneRecordStore),
    };
    tracing::info!(backend = store.name(), "store.ready");
    Ok(store)
}

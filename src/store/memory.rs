use super::{RecordKey, RecordStore, StoreFuture, StoredRecord};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<RecordKey, StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn upsert<'a>(&'a self, key: &'a RecordKey, payload: Value) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let record = StoredRecord {
                payload,
                updated_at: Utc::now(),
            };
            self.records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.clone(), record);
            Ok(())
        })
    }

    fn select<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, Option<StoredRecord>> {
        Box::pin(async move {
            Ok(self
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned())
        })
    }

    fn delete<'a>(&'a self, key: &'a RecordKey) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            Ok(self
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(key)
                .is_some())
        })
    }
}

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use placement_types::Collection;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::remote::RemoteStore;

/// In-process `RemoteStore` used for demo mode and tests.
///
/// Assigns ids and timestamps the way the hosted store does, and can be told
/// to fail reads or inserts per collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    tables: HashMap<Collection, Vec<Value>>,
    failing_fetch: HashSet<Collection>,
    failing_insert: HashSet<Collection>,
    fetch_delay: Option<Duration>,
    select_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store a row exactly as given, bypassing id/timestamp assignment.
    pub fn seed(&self, collection: Collection, row: Value) {
        self.lock().tables.entry(collection).or_default().push(row);
    }

    pub fn fail_fetch(&self, collection: Collection, failing: bool) {
        toggle(&mut self.lock().failing_fetch, collection, failing);
    }

    pub fn fail_insert(&self, collection: Collection, failing: bool) {
        toggle(&mut self.lock().failing_insert, collection, failing);
    }

    /// Delay every `select_all` by `delay`.
    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        self.lock().fetch_delay = delay;
    }

    /// Number of `select_all` calls served so far.
    pub fn select_calls(&self) -> usize {
        self.lock().select_calls
    }

    pub fn row_count(&self, collection: Collection) -> usize {
        self.lock().tables.get(&collection).map_or(0, Vec::len)
    }
}

fn toggle(set: &mut HashSet<Collection>, collection: Collection, on: bool) {
    if on {
        set.insert(collection);
    } else {
        set.remove(&collection);
    }
}

fn created_at(row: &Value) -> Option<DateTime<Utc>> {
    row.get("created_at")?
        .as_str()?
        .parse::<DateTime<Utc>>()
        .ok()
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let (delay, result) = {
            let mut inner = self.lock();
            inner.select_calls += 1;

            let result = if inner.failing_fetch.contains(&collection) {
                Err(StoreError::Unavailable {
                    collection,
                    reason: "injected fetch failure".into(),
                })
            } else {
                // Newest insert first, then a stable sort keeps that order for ties.
                let mut rows: Vec<Value> = inner
                    .tables
                    .get(&collection)
                    .map(|rows| rows.iter().rev().cloned().collect())
                    .unwrap_or_default();
                rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
                Ok(rows)
            };
            (inner.fetch_delay, result)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError> {
        let mut inner = self.lock();
        if inner.failing_insert.contains(&collection) {
            return Err(StoreError::Unavailable {
                collection,
                reason: "injected insert failure".into(),
            });
        }

        let Value::Object(mut fields) = row else {
            return Err(StoreError::Unavailable {
                collection,
                reason: "row must be a JSON object".into(),
            });
        };
        fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        fields.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));

        let stored = Value::Object(fields);
        inner
            .tables
            .entry(collection)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let row = store
            .insert(Collection::Questions, json!({ "text": "Explain VLOOKUP" }))
            .await
            .unwrap();
        assert!(row["id"].as_str().is_some());
        assert!(created_at(&row).is_some());
        assert_eq!(store.row_count(Collection::Questions), 1);
    }

    #[tokio::test]
    async fn select_returns_newest_first() {
        let store = MemoryStore::new();
        store.seed(
            Collection::Jobs,
            json!({ "id": "old", "created_at": "2025-01-01T00:00:00Z" }),
        );
        store.seed(
            Collection::Jobs,
            json!({ "id": "new", "created_at": "2025-02-01T00:00:00Z" }),
        );
        store.seed(
            Collection::Jobs,
            json!({ "id": "mid", "created_at": "2025-01-15T00:00:00Z" }),
        );

        let rows = store.select_all(Collection::Jobs).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryStore::new();
        store.fail_fetch(Collection::Answers, true);
        store.fail_insert(Collection::Answers, true);

        assert!(store.select_all(Collection::Answers).await.is_err());
        assert!(store.insert(Collection::Answers, json!({})).await.is_err());
        assert!(store.select_all(Collection::Questions).await.is_ok());

        store.fail_fetch(Collection::Answers, false);
        assert!(store.select_all(Collection::Answers).await.is_ok());
        assert_eq!(store.select_calls(), 3);
    }
}

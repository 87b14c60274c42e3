use async_trait::async_trait;
use placement_types::Collection;
use serde_json::Value;

use crate::error::StoreError;

/// Row-level access to the hosted store.
///
/// Rows travel as raw JSON; typing happens in the sync layer so that one
/// trait object serves all four collections.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `select *` from the collection, newest `created_at` first.
    async fn select_all(&self, collection: Collection) -> Result<Vec<Value>, StoreError>;

    /// Insert exactly one row and return it as stored, with the generated
    /// `id` and `created_at` filled in.
    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError>;
}

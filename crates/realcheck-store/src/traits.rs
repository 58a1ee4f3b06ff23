use crate::StoreResult;
use async_trait::async_trait;
use realcheck_types::{SelectionRecord, StoredSelection};

/// Durable append-only log of confirmed decisions.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Create the selections table and its id sequence if absent.
    async fn init_schema(&self) -> StoreResult<()>;

    /// Append one record and return its surrogate id.
    async fn append(&self, record: &SelectionRecord) -> StoreResult<i64>;

    /// All stored records, oldest first.
    async fn query_all(&self) -> StoreResult<Vec<StoredSelection>>;
}

//! In-memory response store.
//!
//! Deterministic and test-friendly; contents vanish with the process.

use crate::traits::ResponseStore;
use crate::StoreResult;
use async_trait::async_trait;
use realcheck_types::{SelectionRecord, StoredSelection};
use tokio::sync::RwLock;

/// In-memory append-only log.
#[derive(Debug, Default)]
pub struct InMemoryResponseStore {
    rows: RwLock<Vec<StoredSelection>>,
}

impl InMemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseStore for InMemoryResponseStore {
    async fn init_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn append(&self, record: &SelectionRecord) -> StoreResult<i64> {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |row| row.id + 1);
        rows.push(StoredSelection {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn query_all(&self) -> StoreResult<Vec<StoredSelection>> {
        Ok(self.rows.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use realcheck_types::{ExampleId, UserId};

    fn record(user: &str, selected_real: bool) -> SelectionRecord {
        SelectionRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            user_id: UserId::new(user),
            real_example_id: ExampleId::new("r1"),
            synthetic_example_id: ExampleId::new("s1"),
            selected_real,
            model_id: "m".to_string(),
            instruct_lang: "de".to_string(),
            generation_method: "g".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_increase_and_order_is_kept() {
        let store = InMemoryResponseStore::new();
        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();

        let first = store.append(&record("a", true)).await.unwrap();
        let second = store.append(&record("b", false)).await.unwrap();
        assert!(second > first);

        let rows = store.query_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record, record("a", true));
        assert_eq!(rows[1].record, record("b", false));
    }
}

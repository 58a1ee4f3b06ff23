//! SQLite adapter for the response store.
//!
//! A single file-backed database shared by every session of the process (and
//! by any other process pointed at the same file). Writers are serialized by
//! SQLite itself: the pool runs in WAL mode with a busy timeout, so
//! concurrent `append` and `init_schema` calls wait for the lock instead of
//! failing.

use crate::traits::ResponseStore;
use crate::{PersistenceError, StoreResult};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use realcheck_types::{ExampleId, SelectionRecord, StoredSelection, UserId};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const CREATE_USER_SELECTIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS user_selections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TIMESTAMP,
        user_id TEXT,
        real_example_id TEXT,
        synthetic_example_id TEXT,
        selected_real BOOLEAN,
        model_id TEXT,
        instruct_lang TEXT,
        generation_method TEXT
    )
"#;

/// SQLite-backed append-only response log.
#[derive(Debug, Clone)]
pub struct SqliteResponseStore {
    pool: SqlitePool,
}

impl SqliteResponseStore {
    /// Open (creating if missing) the database file and initialize the schema.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_options(path, 5, 5).await
    }

    /// Open with explicit pool parameters.
    pub async fn open_with_options(
        path: impl AsRef<Path>,
        max_connections: u32,
        busy_timeout_secs: u64,
    ) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                PersistenceError::OpenFailed(format!("{}: {e}", path.as_ref().display()))
            })?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Release every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ResponseStore for SqliteResponseStore {
    async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_USER_SELECTIONS)
            .execute(&self.pool)
            .await
            .map_err(|e| PersistenceError::OpenFailed(format!("schema init failed: {e}")))?;
        Ok(())
    }

    async fn append(&self, record: &SelectionRecord) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_selections (
                timestamp, user_id, real_example_id, synthetic_example_id,
                selected_real, model_id, instruct_lang, generation_method
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.timestamp)
        .bind(record.user_id.as_str())
        .bind(record.real_example_id.as_str())
        .bind(record.synthetic_example_id.as_str())
        .bind(record.selected_real)
        .bind(record.model_id.as_str())
        .bind(record.instruct_lang.as_str())
        .bind(record.generation_method.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| PersistenceError::WriteFailed(e.to_string()))?;

        let id = result.last_insert_rowid();
        debug!(id, user_id = %record.user_id, "Selection appended");
        Ok(id)
    }

    async fn query_all(&self) -> StoreResult<Vec<StoredSelection>> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, user_id, real_example_id, synthetic_example_id,
                   selected_real, model_id, instruct_lang, generation_method
              FROM user_selections
             ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PersistenceError::ReadFailed(e.to_string()))?;

        rows.iter().map(selection_row_to_record).collect()
    }
}

fn selection_row_to_record(row: &SqliteRow) -> StoreResult<StoredSelection> {
    let read_err = |e: sqlx::Error| PersistenceError::ReadFailed(e.to_string());

    let id: i64 = row.try_get("id").map_err(read_err)?;
    let timestamp: NaiveDateTime = row.try_get("timestamp").map_err(read_err)?;
    let user_id: String = row.try_get("user_id").map_err(read_err)?;
    let real_example_id: String = row.try_get("real_example_id").map_err(read_err)?;
    let synthetic_example_id: String = row.try_get("synthetic_example_id").map_err(read_err)?;
    let selected_real: bool = row.try_get("selected_real").map_err(read_err)?;
    let model_id: String = row.try_get("model_id").map_err(read_err)?;
    let instruct_lang: String = row.try_get("instruct_lang").map_err(read_err)?;
    let generation_method: String = row.try_get("generation_method").map_err(read_err)?;

    Ok(StoredSelection {
        id,
        record: SelectionRecord {
            timestamp,
            user_id: UserId::new(user_id),
            real_example_id: ExampleId::new(real_example_id),
            synthetic_example_id: ExampleId::new(synthetic_example_id),
            selected_real,
            model_id,
            instruct_lang,
            generation_method,
        },
    })
}

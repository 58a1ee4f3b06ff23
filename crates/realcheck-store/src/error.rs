use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, PersistenceError>;

/// Response store failures. The engine surfaces these once and never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("failed to open response store: {0}")]
    OpenFailed(String),

    #[error("failed to write selection: {0}")]
    WriteFailed(String),

    #[error("failed to read selections: {0}")]
    ReadFailed(String),
}

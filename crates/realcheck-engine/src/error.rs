use realcheck_corpus::SamplingError;
use realcheck_store::PersistenceError;
use realcheck_types::{PairError, UserId};
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine errors as reported to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `confirm` without a pending pair or without a choice.
    #[error("no selection: a pair must be shown and one example chosen")]
    NoSelection,

    #[error("sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("invalid pair: {0}")]
    InvalidPair(#[from] PairError),

    /// The record was not persisted. The session may still have advanced,
    /// see [`crate::EngineConfig::advance_on_persist_failure`].
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("unknown session: {0}")]
    UnknownSession(UserId),
}

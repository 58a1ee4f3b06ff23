use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for corpus loading.
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Which pool an operation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Real,
    Synthetic,
    Curated,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::Real => f.write_str("real"),
            Pool::Synthetic => f.write_str("synthetic"),
            Pool::Curated => f.write_str("curated"),
        }
    }
}

/// Sampling failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplingError {
    #[error("{0} pool is empty")]
    EmptyCorpus(Pool),
}

/// Loading failures. All of them are absorbed by [`crate::CorpusLoader`].
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The curated pool file could not be read or parsed.
    #[error("configuration error in {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    #[error("failed to fetch {source_name}: {reason}")]
    Fetch { source_name: String, reason: String },

    #[error("failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },
}

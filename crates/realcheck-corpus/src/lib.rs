//! RealCheck Corpus - the three example pools
//!
//! - **general real**: dialogues from the real-conversation dataset
//! - **general synthetic**: generated dialogues with model metadata
//! - **curated**: a small vetted subset of real dialogues, preferred when
//!   sampling and never repeated within one session
//!
//! Pools are read-only once built. Loading is best-effort: a source that
//! cannot be read yields an empty pool and a warning, and sampling from an
//! empty general pool reports [`SamplingError::EmptyCorpus`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod corpus;
mod error;
pub mod loader;
pub mod raw;
pub mod source;

pub use corpus::Corpus;
pub use error::{CorpusError, CorpusResult, Pool, SamplingError};
pub use loader::{load_curated, CorpusLoader};
pub use raw::{RawCall, RawTurn};
pub use source::{DatasetSource, HubDatasetSource, JsonFileSource};

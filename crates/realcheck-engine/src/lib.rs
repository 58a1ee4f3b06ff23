//! RealCheck Engine - the experiment core
//!
//! ## Flow
//!
//! 1. The presentation layer asks for the current pair of a session.
//! 2. A session without a pair asks the [`PairSampler`], which draws one real
//!    and one synthetic example from the corpus, and caches the result.
//! 3. On `confirm` the choice is validated, a [`SelectionRecord`] is appended
//!    to the response store, the exposure set and round counter advance, and
//!    the session either waits for a new pair or completes.
//!
//! A session completes after [`ROUNDS_PER_SESSION`] confirmed rounds.
//!
//! [`SelectionRecord`]: realcheck_types::SelectionRecord

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod config;
mod engine;
mod error;
mod registry;
mod sampler;
mod session;

pub use config::EngineConfig;
pub use engine::{ConfirmOutcome, ExperimentEngine, PendingRound, SessionStatus};
pub use error::{EngineError, EngineResult};
pub use registry::{SessionHandle, Sessions};
pub use sampler::PairSampler;
pub use session::{Session, SessionPhase, ROUNDS_PER_SESSION};

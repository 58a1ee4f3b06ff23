//! RealCheck Types - core vocabulary of the experiment
//!
//! A participant is shown two scripted dialogues per round, one drawn from a
//! real-conversation corpus and one from a synthetic corpus, and picks the one
//! they believe is real.
//!
//! ## Key Concepts
//!
//! - **Example**: one scripted dialogue with optional generation metadata
//! - **SampledExample**: an example tagged with the pool it was drawn from
//! - **Pair**: one round's stimulus, one real and one synthetic, placed left/right
//! - **ExposureSet**: curated examples a session has already judged
//! - **SelectionRecord**: the immutable outcome of one confirmed round

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod example;
pub mod exposure;
pub mod ids;
pub mod pair;
pub mod selection;

pub use example::{Example, GenerationMetadata, SampledExample, Source, Speaker, Utterance};
pub use exposure::ExposureSet;
pub use ids::{ExampleId, UserId};
pub use pair::{Pair, PairError, Slot};
pub use selection::{SelectionRecord, StoredSelection};

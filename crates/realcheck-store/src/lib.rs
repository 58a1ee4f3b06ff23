//! RealCheck response store.
//!
//! Every confirmed round becomes one immutable row in the `user_selections`
//! table. The contract is append-only:
//! - `init_schema` is idempotent and safe to run from every process start
//! - `append` assigns a monotonically increasing surrogate id
//! - `query_all` returns rows in insertion order
//!
//! There is no update or delete path.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

mod error;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod traits;

pub use error::{PersistenceError, StoreResult};
pub use memory::InMemoryResponseStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteResponseStore;
pub use traits::ResponseStore;

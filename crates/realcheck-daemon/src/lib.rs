//! RealCheck Daemon
//!
//! REST presentation layer over the experiment engine:
//! - session lifecycle (start, current pair, confirm, status, end)
//! - completion code once a session has finished all rounds
//! - password-gated export of every stored selection

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use config::DaemonConfig;
pub use error::{ApiError, ApiResult, DaemonError, DaemonResult};
pub use server::Server;

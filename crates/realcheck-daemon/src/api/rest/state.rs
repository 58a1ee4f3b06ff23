//! Application state for API handlers

use realcheck_engine::ExperimentEngine;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ExperimentEngine>,

    /// Code shown to participants who finished all rounds
    pub completion_code: Option<String>,

    /// Export password; `None` disables export
    pub admin_password: Option<String>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        engine: Arc<ExperimentEngine>,
        completion_code: Option<String>,
        admin_password: Option<String>,
    ) -> Self {
        Self {
            engine,
            completion_code,
            admin_password,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }

    /// The completion code, only for a finished session.
    pub fn completion_code_for(&self, completed: bool) -> Option<String> {
        if completed {
            self.completion_code.clone()
        } else {
            None
        }
    }
}

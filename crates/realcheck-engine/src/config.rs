//! Engine configuration

use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the master random source. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Advance the round even when the record could not be persisted.
    ///
    /// `true` keeps the historical behaviour, where a failed write leaves the
    /// session's round counter ahead of the durable log. `false` only
    /// advances after a successful append.
    #[serde(default = "default_true")]
    pub advance_on_persist_failure: bool,

    /// Drop a session after this many seconds without interaction.
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,

    /// Drop a completed session this many seconds after its last round.
    #[serde(default = "default_completed_grace")]
    pub completed_grace_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            advance_on_persist_failure: true,
            session_idle_secs: default_session_idle(),
            completed_grace_secs: default_completed_grace(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_session_idle() -> u64 {
    2 * 60 * 60
}

fn default_completed_grace() -> u64 {
    10 * 60
}

impl EngineConfig {
    /// Reproducible configuration for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    pub fn session_idle_ttl(&self) -> chrono::Duration {
        seconds(self.session_idle_secs)
    }

    pub fn completed_grace(&self) -> chrono::Duration {
        seconds(self.completed_grace_secs)
    }
}

fn seconds(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.seed.is_none());
        assert!(config.advance_on_persist_failure);
        assert_eq!(config.session_idle_ttl(), chrono::Duration::hours(2));
        assert_eq!(config.completed_grace(), chrono::Duration::minutes(10));
    }

    #[test]
    fn test_seeded_keeps_defaults() {
        let config = EngineConfig::seeded(42);
        assert_eq!(config.seed, Some(42));
        assert!(config.advance_on_persist_failure);
    }
}

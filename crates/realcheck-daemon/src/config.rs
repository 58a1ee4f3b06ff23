//! Configuration for realcheck-daemon

use realcheck_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Response store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dataset sources
    #[serde(default)]
    pub corpus: CorpusConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub experiment: ExperimentConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Seconds between sweeps for expired sessions
    #[serde(default = "default_session_sweep")]
    pub session_sweep_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            session_sweep_secs: default_session_sweep(),
        }
    }
}

/// Response store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory store (for development/testing)
    Memory,

    /// SQLite database file
    Sqlite {
        #[serde(default = "default_db_path")]
        path: PathBuf,

        /// Maximum connections in pool
        #[serde(default = "default_pool_size")]
        max_connections: u32,

        /// How long a writer waits for the database lock
        #[serde(default = "default_busy_timeout")]
        busy_timeout_secs: u64,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_db_path(),
            max_connections: default_pool_size(),
            busy_timeout_secs: default_busy_timeout(),
        }
    }
}

/// Where one general pool is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatasetConfig {
    /// Dataset pulled by name from the datasets server
    Hub {
        dataset: String,
        #[serde(default = "default_split")]
        split: String,
        /// Dataset configuration name, when the dataset has several
        #[serde(default, skip_serializing_if = "Option::is_none")]
        config: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        endpoint: Option<String>,
    },

    /// Local JSON or JSON-lines file
    File { path: PathBuf },
}

impl DatasetConfig {
    fn hub(dataset: &str) -> Self {
        DatasetConfig::Hub {
            dataset: dataset.to_string(),
            split: default_split(),
            config: None,
            endpoint: None,
        }
    }
}

/// Corpus sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    pub real: DatasetConfig,
    pub synthetic: DatasetConfig,

    /// Curated pool file (`{"calls": [...]}`)
    #[serde(default = "default_curated_path")]
    pub curated_path: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            real: DatasetConfig::hub("marccgrau/real_calls_dialogsum"),
            synthetic: DatasetConfig::hub("marccgrau/synthetic_data_final_eval"),
            curated_path: default_curated_path(),
        }
    }
}

/// Participant-facing experiment settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Code shown once a session completes
    #[serde(default)]
    pub completion_code: Option<String>,
}

/// Admin export settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Shared password for the export endpoint. Export is disabled without it.
    #[serde(default)]
    pub password: Option<String>,
}

fn default_session_sweep() -> u64 {
    60
}

fn default_db_path() -> PathBuf {
    PathBuf::from("user_selections.db")
}

fn default_pool_size() -> u32 {
    5
}

fn default_busy_timeout() -> u64 {
    5
}

fn default_split() -> String {
    "train".to_string()
}

fn default_curated_path() -> PathBuf {
    PathBuf::from("valid_examples/example_calls.json")
}

impl DaemonConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `REALCHECK_` environment variables (`__` separates sections).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("REALCHECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Development configuration: in-memory store, everything else default.
    pub fn development() -> Self {
        Self {
            storage: StorageConfig::Memory,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert_eq!(config.server.session_sweep_secs, 60);
        assert!(matches!(
            config.storage,
            StorageConfig::Sqlite { ref path, .. } if path == &PathBuf::from("user_selections.db")
        ));
        assert_eq!(
            config.corpus.curated_path,
            PathBuf::from("valid_examples/example_calls.json")
        );
        assert!(config.engine.advance_on_persist_failure);
        assert!(config.admin.password.is_none());
    }

    #[test]
    fn test_corpus_defaults() {
        let config = CorpusConfig::default();
        assert_eq!(
            config.real,
            DatasetConfig::Hub {
                dataset: "marccgrau/real_calls_dialogsum".to_string(),
                split: "train".to_string(),
                config: None,
                endpoint: None,
            }
        );
        assert!(matches!(config.synthetic, DatasetConfig::Hub { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("realcheck.toml");
        std::fs::write(
            &path,
            r#"
[server]
listen_addr = "0.0.0.0:9000"

[storage]
type = "memory"

[corpus.real]
type = "file"
path = "data/real.jsonl"

[corpus.synthetic]
type = "hub"
dataset = "org/synthetic"
config = "de"

[engine]
seed = 42
advance_on_persist_failure = false
session_idle_secs = 900

[experiment]
completion_code = "C1234"
"#,
        )
        .unwrap();

        let config = DaemonConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.listen_addr.port(), 9000);
        assert!(matches!(config.storage, StorageConfig::Memory));
        assert_eq!(
            config.corpus.real,
            DatasetConfig::File {
                path: PathBuf::from("data/real.jsonl")
            }
        );
        assert_eq!(
            config.corpus.synthetic,
            DatasetConfig::Hub {
                dataset: "org/synthetic".to_string(),
                split: "train".to_string(),
                config: Some("de".to_string()),
                endpoint: None,
            }
        );
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.engine.session_idle_ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.engine.completed_grace_secs, 600);
        assert!(!config.engine.advance_on_persist_failure);
        assert_eq!(config.experiment.completion_code.as_deref(), Some("C1234"));
    }
}

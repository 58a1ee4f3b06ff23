//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{CorpusConfig, DaemonConfig, DatasetConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use realcheck_corpus::{Corpus, CorpusLoader, DatasetSource, HubDatasetSource, JsonFileSource};
use realcheck_engine::ExperimentEngine;
use realcheck_store::{InMemoryResponseStore, ResponseStore, SqliteResponseStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Open the configured response store and make sure its schema exists.
pub async fn open_store(config: &StorageConfig) -> DaemonResult<Arc<dyn ResponseStore>> {
    match config {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory response store; selections are lost on exit");
            Ok(Arc::new(InMemoryResponseStore::new()))
        }
        StorageConfig::Sqlite {
            path,
            max_connections,
            busy_timeout_secs,
        } => {
            let store =
                SqliteResponseStore::open_with_options(path, *max_connections, *busy_timeout_secs)
                    .await?;
            tracing::info!(path = %path.display(), "Opened SQLite response store");
            Ok(Arc::new(store))
        }
    }
}

fn dataset_source(config: &DatasetConfig) -> Box<dyn DatasetSource> {
    match config {
        DatasetConfig::Hub {
            dataset,
            split,
            config: dataset_config,
            endpoint,
        } => {
            let mut source = HubDatasetSource::new(dataset.as_str(), split.as_str());
            if let Some(name) = dataset_config {
                source = source.with_config(name.as_str());
            }
            match endpoint {
                Some(endpoint) => Box::new(source.with_endpoint(endpoint.as_str())),
                None => Box::new(source),
            }
        }
        DatasetConfig::File { path } => Box::new(JsonFileSource::new(path.clone())),
    }
}

/// Load the three pools. Never fails; unavailable sources yield empty pools.
pub async fn load_corpus(config: &CorpusConfig) -> Corpus {
    CorpusLoader::new(
        dataset_source(&config.real),
        dataset_source(&config.synthetic),
    )
    .with_curated_path(config.curated_path.clone())
    .load()
    .await
}

/// Periodically drop expired sessions from `engine`.
pub fn spawn_session_sweeper(engine: Arc<ExperimentEngine>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            engine.evict_expired().await;
        }
    })
}

/// RealCheck daemon server
pub struct Server {
    config: DaemonConfig,
    engine: Arc<ExperimentEngine>,
}

impl Server {
    /// Create a new server: open the store, load the corpus, build the engine.
    pub async fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let store = open_store(&config.storage).await?;
        let corpus = load_corpus(&config.corpus).await;

        let engine = ExperimentEngine::new(Arc::new(corpus), store, config.engine.clone());
        engine.init().await?;

        Ok(Self {
            config,
            engine: Arc::new(engine),
        })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(
            Arc::clone(&self.engine),
            self.config.experiment.completion_code.clone(),
            self.config.admin.password.clone(),
        );
        let app = create_router(state);

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("RealCheck daemon listening on {}", addr);
        if self.config.admin.password.is_none() {
            tracing::warn!("No admin password configured; export is disabled");
        }

        let sweep_every = Duration::from_secs(self.config.server.session_sweep_secs.max(1));
        let sweeper = spawn_session_sweeper(Arc::clone(&self.engine), sweep_every);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()));
        sweeper.abort();
        served?;

        tracing::info!(
            active_sessions = self.engine.sessions().len().await,
            "RealCheck daemon shutting down"
        );
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}

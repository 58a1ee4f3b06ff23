//! RealCheck Daemon - forced-choice real vs synthetic dialogue experiment
//!
//! Serves the experiment REST API, or with `export` prints every stored
//! selection as JSON.

use clap::{Parser, Subcommand};
use realcheck_daemon::config::DaemonConfig;
use realcheck_daemon::error::{DaemonError, DaemonResult};
use realcheck_daemon::server::{self, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RealCheck Daemon CLI
#[derive(Parser)]
#[command(name = "realcheckd")]
#[command(about = "RealCheck - real vs synthetic dialogue experiment", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "REALCHECK_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration)
    #[arg(short, long, env = "REALCHECK_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "REALCHECK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "REALCHECK_LOG_JSON")]
    json: bool,

    /// Admin password for the export endpoint
    #[arg(long, env = "ADMIN_PW", hide_env_values = true)]
    admin_password: Option<String>,

    /// Completion code shown after the last round
    #[arg(long, env = "PROLIFIC_CODE")]
    completion_code: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST daemon (default)
    Serve,
    /// Print every stored selection as JSON and exit
    Export,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if cli.admin_password.is_some() {
        config.admin.password = cli.admin_password.clone();
    }
    if cli.completion_code.is_some() {
        config.experiment.completion_code = cli.completion_code.clone();
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                listen = %config.server.listen_addr,
                "Starting RealCheck daemon"
            );
            let server = Server::new(config).await?;
            server.run().await
        }
        Command::Export => {
            let store = server::open_store(&config.storage).await?;
            let selections = store.query_all().await?;
            println!("{}", serde_json::to_string_pretty(&selections)?);
            Ok(())
        }
    }
}

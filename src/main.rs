//! tls-listener
//!
//! Serves a minimal built-in handler over plain HTTP or manually provisioned
//! TLS until SIGINT/SIGTERM/SIGQUIT, then shuts down gracefully.
//!
//! ```text
//! CLI flags ─┐
//! TOML file ─┴─► ServerConfig ─► Server::run ◄── Shutdown ◄── OS signals
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use axum::{routing::get, Router};
use clap::Parser;

use tls_listener::config::{load_config, ServerConfig};
use tls_listener::observability::logging;
use tls_listener::{Server, Shutdown};

#[derive(Parser)]
#[command(name = "tls-listener")]
#[command(about = "Supervised HTTP/HTTPS listener", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host (overrides the config file).
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides the config file).
    #[arg(short, long)]
    port: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("failed to load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    let logger = logging::init(&config.log_level);
    tracing::info!("tls-listener v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    let _signals = shutdown.trigger_on_signal();

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/healthz", get(|| async { "ok" }));

    let mut server = Server::new(config).with_logger(logger);
    match server.run(shutdown, app).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server exited with error");
            ExitCode::FAILURE
        }
    }
}

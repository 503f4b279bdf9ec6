//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber for the binary
//! - Hand the installed dispatcher to the server as its logger

use tracing::Dispatch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber and return its dispatcher.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) -> Dispatch {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tls_listener={default_level},tower_http={default_level}").into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::dispatcher::get_default(Dispatch::clone)
}

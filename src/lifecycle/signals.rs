//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM, SIGQUIT)
//! - Translate signals to a [`ShutdownReason`]
//! - Trigger the shared [`Shutdown`] signal

use crate::lifecycle::shutdown::{Shutdown, ShutdownReason};

/// Wait for a termination signal and report which one arrived.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<ShutdownReason> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let reason = tokio::select! {
        _ = sigint.recv() => ShutdownReason::Interrupt,
        _ = sigterm.recv() => ShutdownReason::Terminate,
        _ = sigquit.recv() => ShutdownReason::Quit,
    };
    Ok(reason)
}

/// Wait for a termination signal and report which one arrived.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<ShutdownReason> {
    tokio::signal::ctrl_c().await?;
    Ok(ShutdownReason::Interrupt)
}

impl Shutdown {
    /// Spawn a task that triggers this signal on the first OS termination signal.
    ///
    /// If signal handlers cannot be installed the error is logged and the
    /// signal is left untriggered.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match wait_for_signal().await {
                Ok(reason) => {
                    tracing::info!(%reason, "Shutdown signal received");
                    shutdown.trigger(reason);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install signal handlers");
                }
            }
        })
    }
}

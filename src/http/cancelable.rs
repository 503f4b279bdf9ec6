//! Cancelable listener runner.
//!
//! Races a serve task against the run's [`Shutdown`] signal:
//!
//! ```text
//! spawn(serve) ──► outcome slot ─┐
//!                                ├─ first wins
//! shutdown.cancelled() ──────────┘
//!
//! serve first:    report its outcome, no shutdown step
//! shutdown first: graceful_shutdown → wait for the slot with a fresh
//!                 deadline → force-close on expiry; a serve error
//!                 arriving in this branch is logged, not returned
//! ```
//!
//! Shutdown is attempted at most once, and only when the serve task has not
//! already finished.

use std::future::Future;
use std::time::Duration;

use axum_server::Handle;
use tokio::sync::oneshot;
use tracing::instrument::WithSubscriber;

use crate::http::error::{ServerError, ShutdownError};
use crate::lifecycle::Shutdown;

/// Deadline for a graceful shutdown, measured from the moment it starts.
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// State owned by one runner invocation; dropped when it returns.
struct ListenerSession {
    handle: Handle,
    outcome: oneshot::Receiver<Result<(), ServerError>>,
    deadline: Duration,
}

impl ListenerSession {
    fn start<F>(handle: Handle, deadline: Duration, serve: F) -> Self
    where
        F: Future<Output = Result<(), ServerError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(
            async move {
                let _ = tx.send(serve.await);
            }
            .with_current_subscriber(),
        );

        Self {
            handle,
            outcome: rx,
            deadline,
        }
    }

    async fn shutdown(self) -> Result<(), ShutdownError> {
        self.handle.graceful_shutdown(None);

        // Once shutdown has started, the serve outcome only marks the end of
        // the drain. Only the deadline can fail it.
        match tokio::time::timeout(self.deadline, self.outcome).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(error))) => {
                tracing::debug!(%error, "serve task failed after shutdown began");
                Ok(())
            }
            Ok(Err(_)) => {
                tracing::debug!("serve task ended without reporting after shutdown began");
                Ok(())
            }
            Err(_) => {
                let open_connections = self.handle.connection_count();
                self.handle.shutdown();
                Err(ShutdownError::DeadlineExceeded {
                    deadline: self.deadline,
                    open_connections,
                })
            }
        }
    }
}

/// Run `serve` until it finishes or `shutdown` fires, whichever comes first.
///
/// `handle` must be the handle the serve future's listener was built with;
/// it is the only thing the shutdown step closes.
pub async fn run_cancelable<F>(
    shutdown: &Shutdown,
    handle: Handle,
    serve: F,
) -> Result<(), ServerError>
where
    F: Future<Output = Result<(), ServerError>> + Send + 'static,
{
    run_cancelable_with_deadline(shutdown, handle, SHUTDOWN_TIMEOUT, serve).await
}

pub(crate) async fn run_cancelable_with_deadline<F>(
    shutdown: &Shutdown,
    handle: Handle,
    deadline: Duration,
    serve: F,
) -> Result<(), ServerError>
where
    F: Future<Output = Result<(), ServerError>> + Send + 'static,
{
    let mut session = ListenerSession::start(handle, deadline, serve);

    tokio::select! {
        biased;

        outcome = &mut session.outcome => outcome.unwrap_or(Err(ServerError::ServeAborted)),
        reason = shutdown.cancelled() => {
            tracing::info!(%reason, "shutting down server...");

            session.shutdown().await?;

            tracing::info!("server shut down gracefully");
            Ok(())
        }
    }
}

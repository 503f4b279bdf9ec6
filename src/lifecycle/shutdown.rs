//! Shutdown coordination.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

/// Why a shutdown was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Cancelled programmatically.
    Cancelled,
    /// SIGINT or Ctrl-C.
    Interrupt,
    /// SIGTERM.
    Terminate,
    /// SIGQUIT.
    Quit,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Cancelled => write!(f, "context canceled"),
            ShutdownReason::Interrupt => write!(f, "received SIGINT"),
            ShutdownReason::Terminate => write!(f, "received SIGTERM"),
            ShutdownReason::Quit => write!(f, "received SIGQUIT"),
        }
    }
}

/// Cancellation signal shared by every listener of one run.
///
/// Clones observe the same signal. The first reason passed to
/// [`trigger`](Self::trigger) wins; later triggers are ignored.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
    reason: Arc<OnceLock<ShutdownReason>>,
}

impl Shutdown {
    /// Create a new, untriggered shutdown signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self, reason: ShutdownReason) {
        // Reason must be visible before any waiter wakes up.
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    /// Shorthand for `trigger(ShutdownReason::Cancelled)`.
    pub fn cancel(&self) {
        self.trigger(ShutdownReason::Cancelled);
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded reason, once triggered.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }

    /// Wait until the signal fires and return its reason.
    pub async fn cancelled(&self) -> ShutdownReason {
        self.token.cancelled().await;
        self.reason().unwrap_or(ShutdownReason::Cancelled)
    }
}

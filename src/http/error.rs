//! Server error taxonomy.
//!
//! Every wrapper keeps its inner error as `source()`, so the original cause
//! stays reachable after crossing the start, server and top-level boundaries.

use std::io;
use std::time::Duration;

/// A TLS mode string that is neither `autocert` nor `manual`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("TLS mode {mode:?} is not supported")]
pub struct UnsupportedTlsModeError {
    pub mode: String,
}

/// Graceful shutdown did not finish.
#[derive(Debug, thiserror::Error)]
pub enum ShutdownError {
    #[error("graceful shutdown did not complete within {deadline:?} ({open_connections} connections open)")]
    DeadlineExceeded {
        deadline: Duration,
        open_connections: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error, reported before any socket is touched.
    #[error(transparent)]
    UnsupportedTlsMode(#[from] UnsupportedTlsModeError),

    /// Autocert mode was selected without a certificate authority.
    #[error("TLS mode \"autocert\" requires a certificate authority")]
    MissingCertificateAuthority,

    #[error("failed to start server: {0}")]
    Start(#[source] io::Error),

    #[error("failed to start TLS server: {0}")]
    StartTls(#[source] io::Error),

    #[error("failed to start ACME challenge server: {0}")]
    StartChallenge(#[source] io::Error),

    #[error("error shutting down server: {0}")]
    Shutdown(#[from] ShutdownError),

    /// The serve task ended without reporting an outcome (it panicked or was aborted).
    #[error("serve task ended without reporting")]
    ServeAborted,

    #[error("server error: {0}")]
    Server(#[source] Box<ServerError>),
}

impl ServerError {
    /// Wrap an error at the server boundary.
    pub(crate) fn server(inner: ServerError) -> Self {
        ServerError::Server(Box::new(inner))
    }

    /// The innermost error, with every `Server` wrapper peeled off.
    pub fn innermost(&self) -> &ServerError {
        match self {
            ServerError::Server(inner) => inner.innermost(),
            other => other,
        }
    }

    /// The underlying I/O error of a start failure, if this is one.
    pub fn start_io_error(&self) -> Option<&io::Error> {
        match self.innermost() {
            ServerError::Start(e) | ServerError::StartTls(e) | ServerError::StartChallenge(e) => {
                Some(e)
            }
            _ => None,
        }
    }

    /// True for configuration errors that are raised before binding.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.innermost(),
            ServerError::UnsupportedTlsMode(_) | ServerError::MissingCertificateAuthority
        )
    }
}

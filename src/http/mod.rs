//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Server::run
//!     → config defaults (port, TLS mode)
//!     → transport selection
//!         ├─ run_unsecured
//!         ├─ run_manual_tls
//!         └─ run_autocert ──spawn──► ACME challenge listener (:80)
//!     → cancelable.rs (serve vs. shutdown race, bounded drain)
//!     → error.rs (start → server → caller wrapping)
//! ```

pub mod cancelable;
pub mod error;
pub mod server;

pub use cancelable::{run_cancelable, SHUTDOWN_TIMEOUT};
pub use error::{ServerError, ShutdownError, UnsupportedTlsModeError};
pub use server::{Server, ACME_CHALLENGE_PORT, HTTP_SERVER_TIMEOUT};

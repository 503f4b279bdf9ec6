//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT/SIGQUIT → Shutdown::trigger(reason)
//!
//! Shutdown (shutdown.rs):
//!     trigger → every listener of the run observes it
//!             → stop accepting → drain within deadline → exit
//! ```
//!
//! # Design Decisions
//! - One signal per run, shared by the primary and challenge listeners
//! - The signal itself carries no deadline; shutdown deadlines are owned by
//!   the listener runner

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownReason};

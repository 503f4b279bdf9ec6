//! Observability subsystem.
//!
//! The library only emits `tracing` events into whatever `Dispatch` the
//! caller injects into [`Server`](crate::Server). Installing a subscriber is
//! the binary's job.

pub mod logging;

#[cfg(any(test, feature = "test-util"))]
#[doc(hidden)]
pub mod capture;

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig host + port
//!     → address.rs (display form for logs, bind-time resolution)
//!     → tls.rs (optional rustls config: static PEM files or
//!               per-handshake certificate authority)
//!     → Hand off to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - The configured address string is never rewritten before binding
//! - TLS is pinned to 1.2 and above
//! - Certificate issuance is an injected collaborator, not owned here

pub mod address;
pub mod tls;

pub use address::{display_http_address, domains_to_https_address, resolve_bind_address};
pub use tls::CertificateAuthority;

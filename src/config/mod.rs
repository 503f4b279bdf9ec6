//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (binary only)
//!     → ServerConfig (defaults for port/mode applied by Server::run)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Only the fields relevant to the selected TLS mode are consulted

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AutoCertConfig, ServerConfig, TlsConfig, DEFAULT_PORT, DEFAULT_TLS_MODE, TLS_MODE_AUTOCERT,
    TLS_MODE_MANUAL,
};

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field is optional; the run-time defaults for `port` and `tls.mode`
//! are applied by [`ServerConfig::apply_defaults`] rather than by serde, so an
//! empty value stays distinguishable from an explicit one until the server runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port used when none is configured.
pub const DEFAULT_PORT: &str = "8080";

/// Automatic certificate provisioning via an ACME certificate authority.
pub const TLS_MODE_AUTOCERT: &str = "autocert";

/// Certificate and key supplied as PEM files.
pub const TLS_MODE_MANUAL: &str = "manual";

/// TLS mode used when TLS is enabled but no mode is configured.
pub const DEFAULT_TLS_MODE: &str = TLS_MODE_AUTOCERT;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen host. Empty means all interfaces.
    pub host: String,

    /// Listen port. Empty means [`DEFAULT_PORT`].
    pub port: String,

    /// Log level used by the binary when `RUST_LOG` is unset.
    pub log_level: String,

    /// Transport security settings.
    pub tls: TlsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: String::new(),
            log_level: "info".to_string(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Fill in the run-time defaults for an empty port and an empty TLS mode.
    ///
    /// Applying defaults twice is a no-op.
    pub fn apply_defaults(&mut self) {
        if self.port.is_empty() {
            self.port = DEFAULT_PORT.to_string();
        }

        if self.tls.mode.is_empty() {
            self.tls.mode = DEFAULT_TLS_MODE.to_string();
        }
    }

    /// The configured `host:port` listen address, exactly as it will be bound.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TLS configuration for the listener.
///
/// Only the fields relevant to the selected `mode` are ever consulted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TlsConfig {
    /// Serve HTTPS instead of plain HTTP.
    pub enabled: bool,

    /// `"autocert"` or `"manual"`. Empty means [`DEFAULT_TLS_MODE`].
    pub mode: String,

    /// Automatic provisioning settings (mode `autocert`).
    pub auto_cert: AutoCertConfig,

    /// Path to certificate chain file, PEM (mode `manual`).
    pub cert_file: PathBuf,

    /// Path to private key file, PEM (mode `manual`).
    pub key_file: PathBuf,
}

/// Settings handed to the certificate authority component.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AutoCertConfig {
    /// Directory where issued certificates are cached across restarts.
    pub cache_dir: PathBuf,

    /// Domains certificates may be requested for.
    pub domains: Vec<String>,

    /// Contact address registered with the certificate authority.
    pub email: String,
}

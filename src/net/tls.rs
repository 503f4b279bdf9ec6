//! TLS configuration and certificate loading.
//!
//! Both TLS modes build a rustls `ServerConfig` restricted to TLS 1.2 and
//! 1.3. Manual mode loads a static certificate chain and key from PEM files;
//! autocert mode asks a [`CertificateAuthority`] for a certificate on every
//! handshake.

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::{ResolvesServerCert, WantsServerCert};
use rustls::{ConfigBuilder, ServerConfig};

use crate::config::AutoCertConfig;

/// The external ACME component used by autocert mode.
///
/// It owns account registration, issuance, renewal, and the certificate
/// cache. This crate only asks it for two things: a per-handshake
/// certificate resolver and the router answering HTTP-01 challenges.
pub trait CertificateAuthority: Send + Sync + 'static {
    /// Resolver consulted during each TLS handshake of the primary listener.
    fn cert_resolver(&self, config: &AutoCertConfig) -> Arc<dyn ResolvesServerCert>;

    /// Router serving `/.well-known/acme-challenge/*`.
    fn challenge_router(&self) -> Router;
}

impl fmt::Debug for dyn CertificateAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CertificateAuthority")
    }
}

fn invalid_data(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

type ServerConfigBuilder = ConfigBuilder<ServerConfig, WantsServerCert>;

/// Start a server config limited to TLS 1.2+ with no client authentication.
fn server_config_builder() -> io::Result<ServerConfigBuilder> {
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let builder = ServerConfig::builder_with_provider(provider)
        .with_protocol_versions(&[&rustls::version::TLS12, &rustls::version::TLS13])
        .map_err(invalid_data)?;
    Ok(builder.with_no_client_auth())
}

fn finish(mut config: ServerConfig) -> RustlsConfig {
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    RustlsConfig::from_config(Arc::new(config))
}

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    let certs = load_certs(cert_path).await?;
    let key = load_private_key(key_path).await?;

    let config = server_config_builder()?
        .with_single_cert(certs, key)
        .map_err(invalid_data)?;

    Ok(finish(config))
}

/// TLS configuration that resolves certificates per handshake.
pub fn resolver_tls_config(resolver: Arc<dyn ResolvesServerCert>) -> io::Result<RustlsConfig> {
    let config = server_config_builder()?.with_cert_resolver(resolver);
    Ok(finish(config))
}

async fn read_pem(path: &Path, what: &str) -> io::Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| {
        io::Error::new(e.kind(), format!("{what} file {}: {e}", path.display()))
    })
}

/// Read a PEM certificate chain.
pub async fn load_certs(path: &Path) -> io::Result<Vec<CertificateDer<'static>>> {
    let pem = read_pem(path, "Certificate").await?;
    let certs = rustls_pemfile::certs(&mut pem.as_slice()).collect::<Result<Vec<_>, _>>()?;

    if certs.is_empty() {
        return Err(invalid_data(format!(
            "no certificates found in {}",
            path.display()
        )));
    }
    Ok(certs)
}

/// Read the first PEM private key (PKCS#8, PKCS#1 or SEC1).
pub async fn load_private_key(path: &Path) -> io::Result<PrivateKeyDer<'static>> {
    let pem = read_pem(path, "Private key").await?;
    rustls_pemfile::private_key(&mut pem.as_slice())?
        .ok_or_else(|| invalid_data(format!("no private key found in {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[tokio::test]
    async fn loads_pem_fixtures() {
        let certs = load_certs(&fixture("localhost.crt")).await.unwrap();
        assert_eq!(certs.len(), 1);
        load_private_key(&fixture("localhost.key")).await.unwrap();

        load_tls_config(&fixture("localhost.crt"), &fixture("localhost.key"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_certificate_is_not_found() {
        let err = load_tls_config(Path::new("/nonexistent.crt"), &fixture("localhost.key"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent.crt"));
    }

    #[tokio::test]
    async fn file_without_key_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a pem file").unwrap();

        let err = load_private_key(file.path()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err = load_certs(file.path()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn key_not_matching_usage_is_rejected() {
        // A certificate file is not a key file.
        let err = load_tls_config(&fixture("localhost.crt"), &fixture("localhost.crt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}

//! Shared utilities for integration testing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::Path, routing::get, Router};
use rustls::server::{ClientHello, ResolvesServerCert};
use rustls::sign::CertifiedKey;
use tls_listener::config::AutoCertConfig;
use tls_listener::CertificateAuthority;

pub use tls_listener::observability::capture::capture_logs;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap()
}

/// GET `url`, retrying while the listener comes up.
pub async fn get_when_ready(client: &reqwest::Client, url: &str) -> (u16, String) {
    for _ in 0..100 {
        if let Ok(res) = client.get(url).send().await {
            let status = res.status().as_u16();
            return (status, res.text().await.unwrap());
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{url} never became reachable");
}

/// Certificate authority that hands out the localhost fixture for every
/// handshake and answers challenges with `<token>.test-thumbprint`.
#[derive(Debug)]
pub struct FixtureAuthority {
    key: Arc<CertifiedKey>,
    pub requested: Mutex<Vec<AutoCertConfig>>,
}

impl FixtureAuthority {
    pub fn new() -> Self {
        let cert_pem = std::fs::read(fixture("localhost.crt")).unwrap();
        let key_pem = std::fs::read(fixture("localhost.key")).unwrap();

        let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let key = rustls_pemfile::private_key(&mut key_pem.as_slice())
            .unwrap()
            .unwrap();
        let signing_key = rustls::crypto::aws_lc_rs::sign::any_supported_type(&key).unwrap();

        Self {
            key: Arc::new(CertifiedKey::new(certs, signing_key)),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[derive(Debug)]
struct FixtureResolver(Arc<CertifiedKey>);

impl ResolvesServerCert for FixtureResolver {
    fn resolve(&self, _client_hello: ClientHello<'_>) -> Option<Arc<CertifiedKey>> {
        Some(Arc::clone(&self.0))
    }
}

impl CertificateAuthority for FixtureAuthority {
    fn cert_resolver(&self, config: &AutoCertConfig) -> Arc<dyn ResolvesServerCert> {
        self.requested.lock().unwrap().push(config.clone());
        Arc::new(FixtureResolver(Arc::clone(&self.key)))
    }

    fn challenge_router(&self) -> Router {
        Router::new().route(
            "/.well-known/acme-challenge/{token}",
            get(|Path(token): Path<String>| async move { format!("{token}.test-thumbprint") }),
        )
    }
}

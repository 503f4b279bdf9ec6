//! Supervised HTTP listener with plain, manual-TLS and autocert transports.
//!
//! [`Server::run`] picks a transport from [`ServerConfig`], serves until the
//! shared [`Shutdown`] signal fires, then drains within a fixed deadline.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use http::{Server, ServerError};
pub use lifecycle::{Shutdown, ShutdownReason};
pub use net::CertificateAuthority;

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    pub use crate::observability::capture::capture_logs;

    pub fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    /// GET `url`, retrying while the listener comes up.
    pub async fn get_when_ready(url: &str) -> String {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        for _ in 0..50 {
            if let Ok(res) = client.get(url).send().await {
                return res.text().await.unwrap();
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("{url} never became reachable");
    }
}

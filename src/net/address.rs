//! Listen address handling.
//!
//! The configured `host:port` string is passed around untouched. It is only
//! rewritten in two places: for display in log lines, and at bind time when
//! it is resolved to a socket address.

use std::io;
use std::net::SocketAddr;

/// Host shown (and bound) for a bare `:port` address.
const WILDCARD_HOST: &str = "0.0.0.0";

/// Display form of a plain HTTP listen address.
///
/// A bare `:port` is shown with an explicit wildcard host. This only affects
/// what operators see; the bind target is unchanged.
pub fn display_http_address(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("http://{WILDCARD_HOST}{addr}")
    } else {
        format!("http://{addr}")
    }
}

/// Display form of the autocert listener: every domain prefixed with
/// `https://`, joined by `, `. No domains gives an empty string.
pub fn domains_to_https_address(domains: &[String]) -> String {
    domains
        .iter()
        .map(|domain| format!("https://{domain}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a `host:port` listen address to the socket address to bind.
///
/// An empty host means all interfaces.
pub async fn resolve_bind_address(addr: &str) -> io::Result<SocketAddr> {
    let target = if addr.starts_with(':') {
        format!("{WILDCARD_HOST}{addr}")
    } else {
        addr.to_string()
    };

    let mut addrs = tokio::net::lookup_host(target.as_str()).await?;
    addrs.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no addresses found for {addr:?}"),
        )
    })
}

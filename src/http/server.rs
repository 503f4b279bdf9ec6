//! HTTP server setup and run strategies.
//!
//! # Responsibilities
//! - Apply run-time defaults to the configuration
//! - Select the transport (plain HTTP, manual TLS, autocert) from config
//! - Build each listener with fixed timeouts
//! - Hand the listener to the cancelable runner and wrap its outcome
//! - Supervise the ACME challenge listener in autocert mode

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use axum_server::Handle;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use hyper_util::server::conn::auto;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

use crate::config::{ServerConfig, TLS_MODE_AUTOCERT, TLS_MODE_MANUAL};
use crate::http::cancelable::run_cancelable;
use crate::http::error::{ServerError, UnsupportedTlsModeError};
use crate::lifecycle::Shutdown;
use crate::net::tls::{self, CertificateAuthority};
use crate::net::{display_http_address, domains_to_https_address, resolve_bind_address};

/// Header-read timeout of every connection and the per-request handling
/// timeout. There is no separate write or idle bound; idle keep-alive
/// connections end with the shutdown drain.
pub const HTTP_SERVER_TIMEOUT: Duration = Duration::from_secs(60);

/// The ACME HTTP-01 challenge listener always binds this port.
pub const ACME_CHALLENGE_PORT: u16 = 80;

/// HTTP server with a supervised lifecycle.
///
/// `run` blocks until the server stops on its own or the shutdown signal
/// fires and the graceful shutdown completes.
#[derive(Debug, Clone, Default)]
pub struct Server {
    pub config: ServerConfig,

    /// Sink for lifecycle events. Nothing is logged when unset.
    pub logger: Option<Dispatch>,

    /// Required by autocert mode only.
    pub certificate_authority: Option<Arc<dyn CertificateAuthority>>,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_logger(mut self, logger: Dispatch) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_certificate_authority(mut self, authority: Arc<dyn CertificateAuthority>) -> Self {
        self.certificate_authority = Some(authority);
        self
    }

    fn logger(&self) -> Dispatch {
        self.logger.clone().unwrap_or_else(Dispatch::none)
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Defaults for an empty port and TLS mode are written back into
    /// `self.config` before anything else happens.
    pub async fn run(&mut self, shutdown: Shutdown, handler: Router) -> Result<(), ServerError> {
        self.config.apply_defaults();

        let addr = self.config.listen_address();
        let logger = self.logger();

        self.select_transport(&shutdown, &addr, handler)
            .with_subscriber(logger)
            .await
    }

    async fn select_transport(
        &self,
        shutdown: &Shutdown,
        addr: &str,
        handler: Router,
    ) -> Result<(), ServerError> {
        if !self.config.tls.enabled {
            return self.run_unsecured(shutdown, addr, handler).await;
        }

        tracing::debug!("TLS is enabled");

        match self.config.tls.mode.as_str() {
            TLS_MODE_AUTOCERT => self.run_autocert(shutdown, addr, handler).await,
            TLS_MODE_MANUAL => self.run_manual_tls(shutdown, addr, handler).await,
            mode => Err(UnsupportedTlsModeError {
                mode: mode.to_string(),
            }
            .into()),
        }
    }

    /// Serve plain HTTP on `addr`.
    pub async fn run_unsecured(
        &self,
        shutdown: &Shutdown,
        addr: &str,
        handler: Router,
    ) -> Result<(), ServerError> {
        let handle = Handle::new();
        let app = build_app(handler, shutdown);
        let addr = addr.to_string();

        let serve = {
            let handle = handle.clone();
            async move {
                tracing::info!(address = %display_http_address(&addr), "starting server");

                let bind = resolve_bind_address(&addr).await.map_err(ServerError::Start)?;
                let mut server = axum_server::bind(bind).handle(handle);
                apply_timeouts(server.http_builder());

                server
                    .serve(app.into_make_service())
                    .await
                    .map_err(ServerError::Start)
            }
        };

        run_cancelable(shutdown, handle, serve)
            .with_subscriber(self.logger())
            .await
            .map_err(ServerError::server)
    }

    /// Serve HTTPS on `addr` with the configured certificate and key files.
    pub async fn run_manual_tls(
        &self,
        shutdown: &Shutdown,
        addr: &str,
        handler: Router,
    ) -> Result<(), ServerError> {
        let handle = Handle::new();
        let app = build_app(handler, shutdown);
        let addr = addr.to_string();
        let cert_file = self.config.tls.cert_file.clone();
        let key_file = self.config.tls.key_file.clone();

        let serve = {
            let handle = handle.clone();
            async move {
                tracing::info!(address = %format!("https://{addr}"), "starting server");

                let tls_config = tls::load_tls_config(&cert_file, &key_file)
                    .await
                    .map_err(ServerError::StartTls)?;
                let bind = resolve_bind_address(&addr)
                    .await
                    .map_err(ServerError::StartTls)?;
                let mut server = axum_server::bind_rustls(bind, tls_config).handle(handle);
                apply_timeouts(server.http_builder());

                server
                    .serve(app.into_make_service())
                    .await
                    .map_err(ServerError::StartTls)
            }
        };

        run_cancelable(shutdown, handle, serve)
            .with_subscriber(self.logger())
            .await
            .map_err(ServerError::server)
    }

    /// Serve HTTPS on `addr` with certificates from the certificate authority.
    ///
    /// Also starts the ACME challenge listener on port 80. That listener
    /// shares `shutdown` but its failures are only logged.
    pub async fn run_autocert(
        &self,
        shutdown: &Shutdown,
        addr: &str,
        handler: Router,
    ) -> Result<(), ServerError> {
        let authority = self
            .certificate_authority
            .clone()
            .ok_or(ServerError::MissingCertificateAuthority)?;

        tokio::spawn(
            run_acme_challenge_server(
                shutdown.clone(),
                authority.challenge_router(),
                format!(":{ACME_CHALLENGE_PORT}"),
            )
            .with_subscriber(self.logger()),
        );

        let handle = Handle::new();
        let app = build_app(handler, shutdown);
        let addr = addr.to_string();
        let auto_cert = self.config.tls.auto_cert.clone();

        let serve = {
            let handle = handle.clone();
            async move {
                let address = domains_to_https_address(&auto_cert.domains);
                tracing::info!(%address, "starting server");

                let resolver = authority.cert_resolver(&auto_cert);
                let tls_config = tls::resolver_tls_config(resolver).map_err(ServerError::StartTls)?;
                let bind = resolve_bind_address(&addr)
                    .await
                    .map_err(ServerError::StartTls)?;
                let mut server = axum_server::bind_rustls(bind, tls_config).handle(handle);
                apply_timeouts(server.http_builder());

                server
                    .serve(app.into_make_service())
                    .await
                    .map_err(ServerError::StartTls)
            }
        };

        run_cancelable(shutdown, handle, serve)
            .with_subscriber(self.logger())
            .await
            .map_err(ServerError::server)
    }
}

/// Serve the ACME challenge router on `addr` until `shutdown` fires.
///
/// Never fails: any error is logged and dropped so certificate provisioning
/// cannot take the primary listener down.
pub(crate) async fn run_acme_challenge_server(shutdown: Shutdown, challenge: Router, addr: String) {
    let handle = Handle::new();
    let app = build_app(challenge, &shutdown);

    let serve = {
        let handle = handle.clone();
        async move {
            tracing::info!(address = %addr, "HTTP (ACME challenge) listening");

            let bind = resolve_bind_address(&addr)
                .await
                .map_err(ServerError::StartChallenge)?;
            let mut server = axum_server::bind(bind).handle(handle);
            apply_timeouts(server.http_builder());

            server
                .serve(app.into_make_service())
                .await
                .map_err(ServerError::StartChallenge)
        }
    };

    if let Err(error) = run_cancelable(&shutdown, handle, serve).await {
        tracing::error!(%error, "ACME challenge server error");
    }
}

/// Wrap the caller's handler with the request timeout, tracing and the
/// shutdown signal as a request extension.
#[allow(deprecated)]
fn build_app(handler: Router, shutdown: &Shutdown) -> Router {
    handler
        .layer(Extension(shutdown.clone()))
        .layer(TimeoutLayer::new(HTTP_SERVER_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

/// Header-read timeout on the connection builder. Handler time is bounded by
/// the `TimeoutLayer` in [`build_app`].
fn apply_timeouts(builder: &mut auto::Builder<TokioExecutor>) {
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(HTTP_SERVER_TIMEOUT);
}

//! HTTP server.
//!
//! A blocking `tiny_http` listener feeding a rayon pool. Each request is
//! copied into an [`AppRequest`](response::AppRequest), routed by the pure
//! [`routes::route`] function and written back. Everything a handler needs
//! lives in one [`App`] shared by `Arc`.

pub mod response;
pub mod routes;

use crate::config::{self, ConfigError, Secrets, SiteConfig};
use crate::content::{ContentClient, RetryPolicy};
use crate::http::{ReqwestTransport, Transport, TransportError};
use crate::render::Stylesheet;
use response::AppResponse;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tiny_http::{Request, Server};

/// Consecutive ports tried before giving up.
const MAX_PORT_RETRIES: u16 = 10;

#[derive(Error, Debug)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to bind after {attempts} attempts (ports {first}-{last}): {reason}")]
    Bind {
        attempts: u16,
        first: u16,
        last: u16,
        reason: String,
    },
    #[error("failed to build request pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Application context, built once at startup.
pub struct App {
    pub config: SiteConfig,
    pub secrets: Secrets,
    pub transport: Arc<dyn Transport>,
    pub content: ContentClient,
    pub stylesheet: Stylesheet,
    started: Instant,
}

impl App {
    pub fn new(
        config: SiteConfig,
        secrets: Secrets,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let content = ContentClient::new(
            Arc::clone(&transport),
            &config.content,
            secrets.access_token.clone(),
            RetryPolicy::from_config(&config.retry),
        )?;
        let stylesheet = Stylesheet::new(&config);
        Ok(Self {
            config,
            secrets,
            transport,
            content,
            stylesheet,
            started: Instant::now(),
        })
    }

    /// Production wiring: secrets from the environment, a real HTTP client.
    pub fn from_env(config: SiteConfig) -> Result<Self, ServeError> {
        let transport = ReqwestTransport::new(config.content.timeout())?;
        Ok(Self::new(config, Secrets::from_env(), Arc::new(transport))?)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Bind to `interface`, moving up one port at a time while the port is taken.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr), ServeError> {
    let mut last_error = String::new();
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    tracing::warn!(base_port, port, "port in use, using next free port");
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(ServeError::Bind {
        attempts: MAX_PORT_RETRIES,
        first: base_port,
        last: base_port.saturating_add(MAX_PORT_RETRIES - 1),
        reason: last_error,
    })
}

/// Serve until the listener shuts down.
pub fn serve(app: Arc<App>) -> Result<(), ServeError> {
    let (server, addr) = bind_with_retry(app.config.server.interface, app.config.server.port)?;
    let threads = config::effective_threads(&app.config.server);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("roseridge-http-{i}"))
        .build()?;

    tracing::info!(
        %addr,
        threads,
        environment = app.config.environment.as_str(),
        region = %app.config.content.region,
        content_token = app.content.has_token(),
        "listening on http://{addr}"
    );

    for request in server.incoming_requests() {
        let app = Arc::clone(&app);
        pool.spawn(move || handle_request(&app, request));
    }
    Ok(())
}

fn handle_request(app: &App, mut request: Request) {
    let started = Instant::now();
    let app_request = match response::read_request(&mut request) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, url = request.url(), "failed to read request");
            if let Err(e) = response::send(request, AppResponse::text(400, "400 Bad Request")) {
                tracing::debug!(error = %e, "client went away");
            }
            return;
        }
    };

    let app_response = routes::route(app, &app_request);
    tracing::info!(
        method = app_request.method.as_str(),
        path = %app_request.path,
        status = app_response.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    if let Err(e) = response::send(request, app_response) {
        tracing::debug!(error = %e, path = %app_request.path, "client went away");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedTransport;
    use std::net::Ipv4Addr;

    #[test]
    fn app_wires_token_into_client() {
        let secrets = Secrets {
            access_token: Some("tok".into()),
            ..Secrets::default()
        };
        let app = App::new(SiteConfig::default(), secrets, ScriptedTransport::new(vec![])).unwrap();
        assert!(app.content.has_token());
        assert!(app.uptime() < Duration::from_secs(60));
    }

    #[test]
    fn unknown_region_fails_startup() {
        let mut config = SiteConfig::default();
        config.content.region = "mars".into();
        let result = App::new(config, Secrets::default(), ScriptedTransport::new(vec![]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn bind_skips_taken_port() {
        let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let (first, first_addr) = bind_with_retry(localhost, 0).unwrap();
        let port = first.server_addr().to_ip().unwrap().port();
        assert_eq!(first_addr.port(), 0);
        let (_second, addr) = bind_with_retry(localhost, port).unwrap();
        assert_ne!(addr.port(), port);
    }
}

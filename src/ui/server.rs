//! HTTP server wiring

use std::net::SocketAddr;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::ui::{handlers, websocket};

/// Shared state for all handlers
pub struct AppState {
    pub config: AppConfig,
    pub started_at: Instant,
    /// Currently connected session views
    pub active_sessions: AtomicUsize,
}

/// Web server hosting pages, API and session websockets
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                config,
                started_at: Instant::now(),
                active_sessions: AtomicUsize::new(0),
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handlers::index))
            .route("/session/:id", get(handlers::session_page))
            .route("/api/sessions", post(handlers::create_session))
            .route("/api/status", get(handlers::get_status))
            .route("/ws/session/:id", get(websocket::ws_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = format!(
            "{}:{}",
            self.state.config.ui.bind_address, self.state.config.ui.http_port
        )
        .parse()
        .map_err(|e| Error::Config(format!("invalid bind address: {e}")))?;

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web UI available at http://{addr}");
        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_builds_with_default_config() {
        let server = WebServer::new(AppConfig::default());
        let _router = server.router();
    }
}

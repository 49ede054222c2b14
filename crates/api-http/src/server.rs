//! HTTP Server
//!
//! Binds the router to a TCP listener and serves until the shutdown token
//! fires. Defaults to localhost only; the daemon overrides host/port from
//! the environment.

use crate::handlers::build_router;
use crate::state::AppState;
use podgen_core::application::ShutdownToken;
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8080;

/// HTTP Server Configuration
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Serve until the shutdown token fires.
    pub async fn run(self, mut shutdown: ShutdownToken) -> Result<(), String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind {}: {}", addr, e))?;

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting HTTP server"
        );

        let app = build_router(self.state);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await
            .map_err(|e| format!("HTTP server error: {}", e))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

//! Podgen - Main Entry Point
//!
//! Composition root: wires the SQLite adapters into the submission, query,
//! and relay services, then serves the HTTP API until Ctrl+C.

mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use podgen_api_http::{AppState, HttpServer, HttpServerConfig};
use podgen_core::application::{shutdown_channel, OutboxRelay, QueryService, SubmissionService};
use podgen_core::port::id_provider::UuidProvider;
use podgen_core::port::time_provider::SystemTimeProvider;
use podgen_core::port::QueueGateway;
use podgen_infra_sqlite::{
    create_pool, run_migrations, SqliteMessageQueue, SqliteOutboxRepository, SqliteTaskRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.podgen/podgen.db";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("PODGEN_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("podgen=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Podgen v{} starting...", VERSION);

    // 1.1. Initialize OpenTelemetry (optional)
    if let Err(e) = telemetry::init_telemetry() {
        tracing::warn!(error = ?e, "Failed to initialize OpenTelemetry (continuing without it)");
    }

    // 2. Load configuration
    let db_path = std::env::var("PODGEN_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let http_host =
        std::env::var("PODGEN_HTTP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let http_port: u16 = std::env::var("PODGEN_HTTP_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    info!(db_path = %db_path, "Initializing database...");

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
    let outbox_repo = Arc::new(SqliteOutboxRepository::new(pool.clone()));
    let queue: Arc<dyn QueueGateway> =
        Arc::new(SqliteMessageQueue::new(pool.clone(), time_provider.clone()));

    let submission = Arc::new(SubmissionService::new(
        task_repo.clone(),
        id_provider.clone(),
        time_provider.clone(),
    ));
    let query = Arc::new(QueryService::new(task_repo.clone()));

    // 5. Recover outbox rows left by a previous run, then start the relay
    let relay = OutboxRelay::new(outbox_repo.clone(), queue.clone(), time_provider.clone());

    info!("Draining outbox from previous runs...");
    match relay.drain_once().await {
        Ok(dispatched) => info!(dispatched, "Startup outbox drain completed"),
        Err(e) => error!(error = ?e, "Startup outbox drain failed"),
    }

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    info!("Starting outbox relay...");
    let relay_token = shutdown_rx.clone();
    let relay_handle = tokio::spawn(async move {
        if let Err(e) = relay.run(relay_token).await {
            error!(error = ?e, "Outbox relay failed");
        }
    });

    // 6. Start HTTP server
    let state = AppState::new(submission, query, queue.clone());
    let server = HttpServer::new(
        HttpServerConfig {
            host: http_host,
            port: http_port,
        },
        state,
    );
    let server_token = shutdown_rx.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(server_token).await {
            error!(error = %e, "HTTP server failed");
        }
    });

    info!("System ready. Waiting for submissions...");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), server_handle).await;
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), relay_handle).await;

    info!("Shutdown complete.");

    Ok(())
}

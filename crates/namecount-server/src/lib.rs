// Server mode - self-hosted HTTP server with an in-process queue
//
// The general-purpose mode that can run anywhere:
// - Docker containers
// - Kubernetes
// - Local development
// - VM instances
//
// Greeted names flow through an in-process queue to a single drain
// consumer task, which is the one writer of the counter document. That
// single-writer arrangement is what keeps the store's unconditional
// read-modify-write from losing updates.

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use namecount_config::{QueueBackend, RuntimeConfig};
use namecount_handlers::HandlerError;
use namecount_queue::InMemoryNameQueue;
use namecount_store::CounterStore;
use serde_json::json;
use std::time::Duration;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod drain;
mod handlers;
mod init;

use drain::run_drain_loop;
use handlers::{handle_greet_request, health_check, ready_check};
use init::init_tracing;

/// Application state shared across all requests
#[derive(Clone)]
pub(crate) struct AppState {
    pub queue: InMemoryNameQueue,
    pub store: CounterStore,
}

/// Error type that implements IntoResponse
#[derive(Debug)]
pub(crate) struct AppError(HandlerError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(
            error_type = self.0.error_type(),
            "Request error: {}",
            self.0.message()
        );
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(json!({
                "error": self.0.message(),
                "error_type": self.0.error_type(),
            })),
        )
            .into_response()
    }
}

impl From<HandlerError> for AppError {
    fn from(err: HandlerError) -> Self {
        Self(err)
    }
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

/// Entry point for server mode
pub async fn run_with_config(config: RuntimeConfig) -> Result<()> {
    init_tracing(&config);

    let server_config = config
        .server
        .clone()
        .context("server configuration required")?;

    if config.queue.backend != QueueBackend::Memory {
        anyhow::bail!(
            "server mode drains an in-process queue; queue.backend must be 'memory', not '{}'",
            config.queue.backend
        );
    }

    info!("Server mode - in-process queue with a single drain consumer");

    let store = CounterStore::from_config(&config.store)
        .context("Failed to initialize counter store")?;
    info!(
        backend = %config.store.backend,
        key = store.key(),
        "counter store initialized"
    );

    let (queue, consumer) = namecount_queue::in_memory();
    let mut drain_handle = tokio::spawn(run_drain_loop(
        consumer,
        store.clone(),
        config.drain.max_batch_size,
    ));
    info!(
        max_batch_size = config.drain.max_batch_size,
        "drain consumer started"
    );

    let state = AppState { queue, store };

    let app = Router::new()
        .route("/hello/:name", get(handle_greet_request))
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&server_config.listen_addr)
        .await
        .context(format!("Failed to bind to {}", server_config.listen_addr))?;

    info!(
        "Greeting endpoint listening on http://{}",
        server_config.listen_addr
    );
    info!("Routes:");
    info!(
        "  GET http://{}/hello/{{name}} - greet and count",
        server_config.listen_addr
    );
    info!(
        "  GET http://{}/health        - health check",
        server_config.listen_addr
    );
    info!(
        "  GET http://{}/ready         - readiness check",
        server_config.listen_addr
    );
    info!("Press Ctrl+C or send SIGTERM to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and with it every queue producer) is gone; give the
    // drain task a bounded window to flush what is already queued.
    if tokio::time::timeout(Duration::from_secs(10), &mut drain_handle)
        .await
        .is_err()
    {
        warn!("drain consumer did not finish in time; aborting");
        drain_handle.abort();
    }

    info!("Server shutdown complete");

    Ok(())
}

use std::io;
use axum::{
    routing::get,
    Router,
    extract::State,
    Json,
};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use crate::dashboard::dashboard_remote_write::{get_remote_write, get_remote_writes};
use crate::StatusEngine;

pub fn status_router(engine: StatusEngine) -> Router {
    Router::new()
        .route("/api/v1/status/remote_write", get(get_remote_writes))
        .route("/api/v1/status/remote_write/{name}", get(get_remote_write))
        .route("/health", get(health))
        .layer(CompressionLayer::new())
        .with_state(engine)
}

/// Serves until Ctrl-C, then cancels `engine.shutdown` so in-flight status
/// requests stop visiting further queues.
pub async fn start_status_server(engine: StatusEngine, addr: &str) -> io::Result<()> {
    let shutdown = engine.shutdown.clone();
    let app = status_router(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Remote write status available at http://{}/api/v1/status/remote_write", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub uptime_seconds: u64,
}

async fn health(State(engine): State<StatusEngine>) -> Json<Health> {
    Json(Health {
        status: "ok",
        uptime_seconds: engine.start_time.elapsed().as_secs(),
    })
}

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use rw_status::brokers::remote_write::RemoteWriteRegistry;
use rw_status::config::Config;
use rw_status::dashboard::server::start_status_server;
use rw_status::StatusEngine;

// ========================================
// MAIN ENTRY POINT
// ========================================

#[tokio::main]
async fn main() {
    let config = Config::global();

    let filter = EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = Arc::new(RemoteWriteRegistry::from_config(&config.remote_write));
    let engine = StatusEngine::new(registry.clone());

    let addr = config.server.addr();
    tracing::info!("🚀 Remote write status server starting ({} queue(s))", registry.len());

    if let Err(e) = start_status_server(engine, &addr).await {
        tracing::error!("Status server on {} failed: {}", addr, e);
        std::process::exit(1);
    }

    registry.close();
    tracing::info!("Status server stopped");
}

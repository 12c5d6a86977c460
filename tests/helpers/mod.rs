use std::sync::Arc;
use axum_test::TestServer;
use rw_status::brokers::remote_write::{
    QueueManager, QueueManagerConfig, QueueRegistry, RemoteWriteQueue, RemoteWriteRegistry, StoreClient,
};
use rw_status::dashboard::server::status_router;
use rw_status::error::RetrievalError;
use rw_status::StatusEngine;

pub fn setup_server(registry: Arc<dyn QueueRegistry>) -> TestServer {
    let engine = StatusEngine::new(registry);
    TestServer::new(status_router(engine)).unwrap()
}

pub fn queue_config(min: usize, max: usize) -> QueueManagerConfig {
    QueueManagerConfig {
        min_shards: min,
        max_shards: max,
    }
}

/// Two queues: `A` (max 10, min 1, at 3 shards, settled) and `B` (at 1 shard, resharding).
pub fn scenario_registry() -> Arc<RemoteWriteRegistry> {
    let registry = Arc::new(RemoteWriteRegistry::new());

    let a = registry.register(StoreClient::new("A", "http://a"), queue_config(1, 10));
    a.begin_reshard();
    a.finish_reshard(3);

    let b = registry.register(StoreClient::new("B", "http://b"), queue_config(1, 10));
    b.begin_reshard();

    registry
}

/// Lists a fixed set of queues, even ones that have since been stopped.
pub struct StaticRegistry(pub Vec<Arc<dyn RemoteWriteQueue>>);

impl QueueRegistry for StaticRegistry {
    fn queues(&self) -> Result<Vec<Arc<dyn RemoteWriteQueue>>, RetrievalError> {
        Ok(self.0.clone())
    }
}

pub fn standalone_queue(name: &str) -> Arc<QueueManager> {
    Arc::new(QueueManager::new(
        StoreClient::new(name, format!("http://{}", name.to_lowercase())),
        queue_config(1, 10),
    ))
}

//! Registry of the remote write queues configured in this process.
//! Keeps declaration order so the status API lists queues the way they were configured.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use hashlink::LinkedHashMap;
use parking_lot::RwLock;

use crate::brokers::remote_write::{
    QueueManager, QueueManagerConfig, QueueRegistry, RemoteWriteQueue, StoreClient,
};
use crate::config::RemoteWriteConfig;
use crate::error::RetrievalError;

pub struct RemoteWriteRegistry {
    queues: RwLock<LinkedHashMap<String, Arc<QueueManager>>>,
    closed: AtomicBool,
}

impl RemoteWriteRegistry {
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(LinkedHashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Declares one queue per configured destination.
    pub fn from_config(config: &RemoteWriteConfig) -> Self {
        let registry = Self::new();
        let queue_config = config.queue_config();
        for (name, endpoint) in &config.queues {
            registry.register(StoreClient::new(name.clone(), endpoint.clone()), queue_config.clone());
        }
        tracing::info!("[Registry] {} remote write queue(s) declared", registry.len());
        registry
    }

    /// Returns the existing queue if `name` is already registered.
    pub fn register(&self, client: StoreClient, config: QueueManagerConfig) -> Arc<QueueManager> {
        let mut queues = self.queues.write();
        if let Some(existing) = queues.get(client.name()) {
            return existing.clone();
        }

        tracing::info!("[Registry] Registering queue '{}' -> {}", client.name(), client.endpoint());
        let name = client.name().to_string();
        let queue = Arc::new(QueueManager::new(client, config));
        queues.insert(name, queue.clone());
        queue
    }

    pub fn get(&self, name: &str) -> Option<Arc<QueueManager>> {
        self.queues.read().get(name).cloned()
    }

    /// Unregisters and stops the queue. Readers still holding it see it as closed.
    pub fn remove(&self, name: &str) -> Option<Arc<QueueManager>> {
        let removed = self.queues.write().remove(name);
        if let Some(queue) = &removed {
            queue.stop();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.queues.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shuts the registry down; listing fails from now on.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        for queue in self.queues.read().values() {
            queue.stop();
        }
    }
}

impl Default for RemoteWriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueRegistry for RemoteWriteRegistry {
    fn queues(&self) -> Result<Vec<Arc<dyn RemoteWriteQueue>>, RetrievalError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RetrievalError::Unavailable("registry is shut down".to_string()));
        }
        Ok(self
            .queues
            .read()
            .values()
            .map(|q| q.clone() as Arc<dyn RemoteWriteQueue>)
            .collect())
    }
}

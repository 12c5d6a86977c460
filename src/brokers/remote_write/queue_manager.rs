//! Queue Manager: in-memory state of one remote write destination.
//!
//! The shipping path writes through the methods here; the status API only
//! reads through `RemoteWriteQueue`. No accessor holds a lock across another.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;

use crate::brokers::remote_write::{
    QueueManagerConfig, RemoteWriteQueue, Shard, ShardState, ShardingSnapshot, StoreClient,
};
use crate::error::QueueReadError;

pub struct QueueManager {
    client: StoreClient,
    config: QueueManagerConfig,
    current_shards: AtomicUsize,
    resharding: AtomicBool,
    stopped: AtomicBool,
    calculations: RwLock<ShardingSnapshot>,
    shards: RwLock<Vec<Arc<Shard>>>,
}

impl QueueManager {
    pub fn new(client: StoreClient, config: QueueManagerConfig) -> Self {
        let initial = config.min_shards;
        Self {
            client,
            config,
            current_shards: AtomicUsize::new(initial),
            resharding: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            calculations: RwLock::new(ShardingSnapshot::default()),
            shards: RwLock::new(Self::spawn_shards(initial)),
        }
    }

    fn spawn_shards(n: usize) -> Vec<Arc<Shard>> {
        (0..n).map(|_| Arc::new(Shard::new())).collect()
    }

    pub fn name(&self) -> &str {
        self.client.name()
    }

    fn ensure_running(&self) -> Result<(), QueueReadError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(QueueReadError::Closed);
        }
        Ok(())
    }

    // ========================================
    // WRITE SIDE
    // ========================================

    pub fn update_sharding_calculations(&self, snapshot: ShardingSnapshot) {
        *self.calculations.write() = snapshot;
    }

    pub fn begin_reshard(&self) {
        self.resharding.store(true, Ordering::Release);
        tracing::debug!("[QueueManager] '{}' resharding started", self.client.name());
    }

    /// Replaces the shard pool with `n` fresh shards and clears the resharding flag.
    /// Pending samples of the old pool are not carried over.
    pub fn finish_reshard(&self, n: usize) {
        {
            let mut shards = self.shards.write();
            *shards = Self::spawn_shards(n);
            self.current_shards.store(n, Ordering::Release);
        }
        self.resharding.store(false, Ordering::Release);
        tracing::info!("[QueueManager] '{}' resharded to {} shards", self.client.name(), n);
    }

    pub fn shard(&self, index: usize) -> Option<Arc<Shard>> {
        self.shards.read().get(index).cloned()
    }

    /// After this every read fails with `QueueReadError::Closed`.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        tracing::info!("[QueueManager] '{}' stopped", self.client.name());
    }
}

impl RemoteWriteQueue for QueueManager {
    fn store_client(&self) -> Result<StoreClient, QueueReadError> {
        self.ensure_running()?;
        Ok(self.client.clone())
    }

    fn config(&self) -> Result<QueueManagerConfig, QueueReadError> {
        self.ensure_running()?;
        Ok(self.config.clone())
    }

    fn current_shard_count(&self) -> Result<usize, QueueReadError> {
        self.ensure_running()?;
        Ok(self.current_shards.load(Ordering::Acquire))
    }

    fn is_resharding(&self) -> Result<bool, QueueReadError> {
        self.ensure_running()?;
        Ok(self.resharding.load(Ordering::Acquire))
    }

    fn sharding_snapshot(&self) -> Result<ShardingSnapshot, QueueReadError> {
        self.ensure_running()?;
        Ok(self.calculations.read().clone())
    }

    fn shards(&self) -> Result<Vec<ShardState>, QueueReadError> {
        self.ensure_running()?;
        let shards = self.shards.read().clone();
        Ok(shards.iter().map(|s| s.state()).collect())
    }
}

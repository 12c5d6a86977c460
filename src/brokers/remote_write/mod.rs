use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};

use crate::error::{QueueReadError, RetrievalError};

mod queue_manager;
mod registry;
mod shard;

pub use queue_manager::QueueManager;
pub use registry::RemoteWriteRegistry;
pub use shard::Shard;

// ---------- StoreClient ----------

/// Identity of the destination a queue ships samples to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreClient {
    name: String,
    endpoint: String,
}

impl StoreClient {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

// ---------- QueueManagerConfig ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueManagerConfig {
    pub min_shards: usize,
    pub max_shards: usize,
}

impl Default for QueueManagerConfig {
    fn default() -> Self {
        Self {
            min_shards: 1,
            max_shards: 50,
        }
    }
}

// ---------- ShardingSnapshot ----------

/// Inputs and output of the most recent desired-shards calculation.
/// Overwritten as a whole every time the queue recomputes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardingSnapshot {
    pub last_ran: DateTime<Utc>,
    pub delay: f64,
    pub desired_shards: f64,
    pub highest_recv: f64,
    pub highest_sent: f64,
    pub samples_in_rate: f64,
    pub samples_kept_ratio: f64,
    pub samples_out_duration: f64,
    pub samples_out_rate: f64,
    pub samples_pending: f64,
    pub samples_pending_rate: f64,
    pub time_per_sample: f64,
}

impl Default for ShardingSnapshot {
    fn default() -> Self {
        Self {
            last_ran: DateTime::<Utc>::UNIX_EPOCH,
            delay: 0.0,
            desired_shards: 0.0,
            highest_recv: 0.0,
            highest_sent: 0.0,
            samples_in_rate: 0.0,
            samples_kept_ratio: 0.0,
            samples_out_duration: 0.0,
            samples_out_rate: 0.0,
            samples_pending: 0.0,
            samples_pending_rate: 0.0,
            time_per_sample: 0.0,
        }
    }
}

// ---------- ShardState ----------

/// Point-in-time copy of one shard.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardState {
    pub pending_samples: usize,
    pub last_error: Option<String>,
    pub last_sent_time: DateTime<Utc>,
    pub last_sent_duration: Duration,
}

// ---------- Read interface ----------

/// Read side of a remote write queue, as seen by the status API.
///
/// Every accessor must be safe to call while the queue is being mutated and
/// must not block on the shipping path. Accessors are read independently, so
/// two of them may observe different instants.
pub trait RemoteWriteQueue: Send + Sync {
    fn store_client(&self) -> Result<StoreClient, QueueReadError>;

    fn config(&self) -> Result<QueueManagerConfig, QueueReadError>;

    fn current_shard_count(&self) -> Result<usize, QueueReadError>;

    fn is_resharding(&self) -> Result<bool, QueueReadError>;

    fn sharding_snapshot(&self) -> Result<ShardingSnapshot, QueueReadError>;

    /// Live shards, in shard order. Queues that don't track per-shard state report none.
    fn shards(&self) -> Result<Vec<ShardState>, QueueReadError> {
        Ok(Vec::new())
    }
}

/// Source of the queues that are active right now.
pub trait QueueRegistry: Send + Sync {
    fn queues(&self) -> Result<Vec<Arc<dyn RemoteWriteQueue>>, RetrievalError>;
}

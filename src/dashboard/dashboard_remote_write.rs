//! Remote write status: snapshots every registered queue into one document.
//!
//! Reads are per-accessor and unsynchronized, so a single `QueueStatus` may mix
//! values from instants a few microseconds apart. A queue that fails to read is
//! left out and reported as a warning; only a registry failure fails the request.

use std::sync::Arc;
use axum::extract::{Path, State};
use axum::Json;
use tokio_util::sync::CancellationToken;

use crate::brokers::remote_write::{QueueRegistry, RemoteWriteQueue, StoreClient};
use crate::dashboard::envelope::ApiResponse;
use crate::dashboard::models::remote_write::{
    QueueStatus, RemoteWriteCollection, ShardStatus, ShardingCalculations,
};
use crate::error::{ApiError, QueueReadError, RetrievalError};
use crate::StatusEngine;

// ========================================
// AGGREGATOR
// ========================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusReport {
    pub collection: RemoteWriteCollection,
    pub warnings: Vec<String>,
}

enum QueueOutcome {
    Collected(QueueStatus),
    Failed(String),
}

pub struct StatusAggregator {
    registry: Arc<dyn QueueRegistry>,
}

impl StatusAggregator {
    pub fn new(registry: Arc<dyn QueueRegistry>) -> Self {
        Self { registry }
    }

    /// Snapshots all queues in registry order.
    ///
    /// If `cancel` fires, no further queues are visited; what was already read
    /// is returned with a warning naming how many queues were skipped.
    pub fn get_status(&self, cancel: &CancellationToken) -> Result<StatusReport, RetrievalError> {
        let queues = self.registry.queues()?;
        let total = queues.len();

        let mut outcomes = Vec::with_capacity(total);
        for (position, queue) in queues.iter().enumerate() {
            if cancel.is_cancelled() {
                outcomes.push(QueueOutcome::Failed(format!(
                    "status request cancelled, {} of {} remote write queues not read",
                    total - position,
                    total
                )));
                break;
            }
            outcomes.push(collect_outcome(position, queue.as_ref()));
        }

        let mut report = StatusReport {
            collection: RemoteWriteCollection { queues: Vec::with_capacity(total) },
            warnings: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                QueueOutcome::Collected(status) => report.collection.queues.push(status),
                QueueOutcome::Failed(warning) => {
                    tracing::warn!("[RemoteWriteStatus] {}", warning);
                    report.warnings.push(warning);
                }
            }
        }

        tracing::debug!(
            "[RemoteWriteStatus] {} queue(s) reported, {} warning(s)",
            report.collection.queues.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    /// Snapshot of the single queue whose destination is called `name`.
    pub fn get_queue_status(&self, name: &str) -> Result<QueueStatus, ApiError> {
        for queue in self.registry.queues()? {
            // Queues that can't even report their identity can't be the one asked for.
            let Ok(client) = queue.store_client() else { continue };
            if client.name() == name {
                return collect_queue(client, queue.as_ref()).map_err(|source| ApiError::QueueRead {
                    name: name.to_string(),
                    source,
                });
            }
        }
        Err(ApiError::NotFound { name: name.to_string() })
    }
}

fn collect_outcome(position: usize, queue: &dyn RemoteWriteQueue) -> QueueOutcome {
    let client = match queue.store_client() {
        Ok(client) => client,
        Err(e) => return QueueOutcome::Failed(format!("remote write queue #{}: {}", position, e)),
    };
    let label = format!("remote write queue '{}' ({})", client.name(), client.endpoint());
    match collect_queue(client, queue) {
        Ok(status) => QueueOutcome::Collected(status),
        Err(e) => QueueOutcome::Failed(format!("{}: {}", label, e)),
    }
}

fn collect_queue(client: StoreClient, queue: &dyn RemoteWriteQueue) -> Result<QueueStatus, QueueReadError> {
    let config = queue.config()?;
    // Flag before count: a cleared flag guarantees the count that follows is post-reshard.
    let is_resharding = queue.is_resharding()?;
    let shards_current = queue.current_shard_count()?;
    let sharding_calculations = ShardingCalculations::from(queue.sharding_snapshot()?);
    let shards = queue.shards()?.into_iter().map(ShardStatus::from).collect();

    Ok(QueueStatus {
        name: client.name().to_string(),
        endpoint: client.endpoint().to_string(),
        shards_max: config.max_shards,
        shards_min: config.min_shards,
        shards_current,
        sharding_calculations,
        is_resharding,
        shards,
    })
}

// ========================================
// HANDLERS
// ========================================

pub async fn get_remote_writes(
    State(engine): State<StatusEngine>,
) -> Result<Json<ApiResponse<RemoteWriteCollection>>, ApiError> {
    let cancel = engine.shutdown.child_token();
    let report = StatusAggregator::new(engine.registry.clone()).get_status(&cancel)?;
    Ok(Json(ApiResponse::success(report.collection, report.warnings)))
}

pub async fn get_remote_write(
    State(engine): State<StatusEngine>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<QueueStatus>>, ApiError> {
    let status = StatusAggregator::new(engine.registry.clone()).get_queue_status(&name)?;
    Ok(Json(ApiResponse::success(status, Vec::new())))
}

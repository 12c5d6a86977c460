use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::brokers::remote_write::{ShardState, ShardingSnapshot};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RemoteWriteCollection {
    pub queues: Vec<QueueStatus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub name: String,
    pub endpoint: String,
    pub shards_max: usize,
    pub shards_min: usize,
    pub shards_current: usize,
    pub sharding_calculations: ShardingCalculations,
    pub is_resharding: bool,
    pub shards: Vec<ShardStatus>,
}

/// Wire form of the queue's last desired-shards calculation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShardingCalculations {
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

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShardStatus {
    pub pending_samples: usize,
    pub last_error: String,
    pub last_sent_time: DateTime<Utc>,
    /// seconds
    pub last_sent_duration: f64,
}

impl From<ShardingSnapshot> for ShardingCalculations {
    fn from(c: ShardingSnapshot) -> Self {
        Self {
            last_ran: c.last_ran,
            delay: c.delay,
            desired_shards: c.desired_shards,
            highest_recv: c.highest_recv,
            highest_sent: c.highest_sent,
            samples_in_rate: c.samples_in_rate,
            samples_kept_ratio: c.samples_kept_ratio,
            samples_out_duration: c.samples_out_duration,
            samples_out_rate: c.samples_out_rate,
            samples_pending: c.samples_pending,
            samples_pending_rate: c.samples_pending_rate,
            time_per_sample: c.time_per_sample,
        }
    }
}

impl From<ShardState> for ShardStatus {
    fn from(s: ShardState) -> Self {
        Self {
            pending_samples: s.pending_samples,
            last_error: s.last_error.unwrap_or_default(),
            last_sent_time: s.last_sent_time,
            last_sent_duration: s.last_sent_duration.as_secs_f64(),
        }
    }
}

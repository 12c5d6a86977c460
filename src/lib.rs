pub mod brokers;
pub mod config;
pub mod dashboard;
pub mod error;

use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use crate::brokers::remote_write::QueueRegistry;

// ========================================
// ENGINE
// ========================================

/// Shared state handed to every status request. Cheap to clone.
#[derive(Clone)]
pub struct StatusEngine {
    pub registry: Arc<dyn QueueRegistry>,
    /// Cancelled on shutdown; each request derives a child token from it.
    pub shutdown: CancellationToken,
    pub start_time: Instant,
}

impl StatusEngine {
    pub fn new(registry: Arc<dyn QueueRegistry>) -> Self {
        Self {
            registry,
            shutdown: CancellationToken::new(),
            start_time: Instant::now(),
        }
    }
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use super::ShardState;

struct LastSend {
    time: DateTime<Utc>,
    duration: Duration,
    error: Option<String>,
}

/// One worker of a queue's shard pool.
pub struct Shard {
    pending: AtomicUsize,
    last_send: RwLock<LastSend>,
}

impl Shard {
    pub fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            last_send: RwLock::new(LastSend {
                time: DateTime::<Utc>::UNIX_EPOCH,
                duration: Duration::ZERO,
                error: None,
            }),
        }
    }

    pub fn enqueue(&self, samples: usize) {
        self.pending.fetch_add(samples, Ordering::Relaxed);
    }

    /// Records the outcome of one batch send. Sent samples leave the pending
    /// count whether or not the send succeeded; a success clears the last error.
    pub fn record_send(&self, sent: usize, duration: Duration, result: Result<(), String>) {
        // Saturating: a late record_send must never wrap the counter.
        let mut current = self.pending.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_sub(sent);
            match self.pending.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        let mut last = self.last_send.write();
        last.time = Utc::now();
        last.duration = duration;
        last.error = result.err();
    }

    pub fn pending_samples(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn state(&self) -> ShardState {
        let last = self.last_send.read();
        ShardState {
            pending_samples: self.pending_samples(),
            last_error: last.error.clone(),
            last_sent_time: last.time,
            last_sent_duration: last.duration,
        }
    }
}

impl Default for Shard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_shard_never_sent() {
        let shard = Shard::new();
        let state = shard.state();
        assert_eq!(state.pending_samples, 0);
        assert_eq!(state.last_error, None);
        assert_eq!(state.last_sent_time, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(state.last_sent_duration, Duration::ZERO);
    }

    #[test]
    fn test_send_drains_pending_and_tracks_error() {
        let shard = Shard::new();
        shard.enqueue(120);
        shard.record_send(100, Duration::from_millis(250), Err("HTTP 503".to_string()));

        let state = shard.state();
        assert_eq!(state.pending_samples, 20);
        assert_eq!(state.last_error.as_deref(), Some("HTTP 503"));
        assert_eq!(state.last_sent_duration, Duration::from_millis(250));
        assert!(state.last_sent_time > DateTime::<Utc>::UNIX_EPOCH);

        shard.record_send(20, Duration::from_millis(10), Ok(()));
        let state = shard.state();
        assert_eq!(state.pending_samples, 0);
        assert_eq!(state.last_error, None);
    }

    #[test]
    fn test_oversized_send_saturates() {
        let shard = Shard::new();
        shard.enqueue(5);
        shard.record_send(50, Duration::ZERO, Ok(()));
        assert_eq!(shard.pending_samples(), 0);
    }

    #[test]
    fn test_concurrent_sends_drain_exactly() {
        let shard = std::sync::Arc::new(Shard::new());
        shard.enqueue(8 * 1000);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let shard = shard.clone();
                scope.spawn(move || {
                    for _ in 0..1000 {
                        shard.record_send(1, Duration::ZERO, Ok(()));
                    }
                });
            }
        });
        assert_eq!(shard.pending_samples(), 0);

        shard.record_send(1, Duration::ZERO, Ok(()));
        assert_eq!(shard.pending_samples(), 0);
    }
}

//! In-process sliding window limiter

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use wb_core::{DomainError, RateLimiter};
use wb_shared::config::WindowLimit;

/// Number of tracked keys that triggers the first sweep of stale keys
const SWEEP_FLOOR: usize = 1024;

/// Sliding window over admitted events, one queue per key behind one lock.
///
/// Mirrors the Redis script: limited events are not recorded, so a caller
/// that keeps hammering is admitted again once the window has moved on.
///
/// A call only prunes its own key. Keys whose window has passed are swept
/// when the table doubles in size, keeping the cost per call constant.
pub struct MemoryRateLimiter {
    window: Duration,
    threshold: u32,
    state: Mutex<WindowTable>,
}

struct WindowTable {
    queues: HashMap<String, VecDeque<Instant>>,
    sweep_at: usize,
}

impl MemoryRateLimiter {
    pub fn new(limit: &WindowLimit) -> Self {
        Self {
            window: Duration::from_millis(limit.window_ms),
            threshold: limit.threshold,
            state: Mutex::new(WindowTable {
                queues: HashMap::new(),
                sweep_at: SWEEP_FLOOR,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) async fn tracked_keys(&self) -> usize {
        self.state.lock().await.queues.len()
    }

    fn is_stale(&self, queue: &VecDeque<Instant>, now: Instant) -> bool {
        queue
            .back()
            .map_or(true, |last| now.saturating_duration_since(*last) >= self.window)
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn allow(&self, key: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        let mut guard = self.state.lock().await;
        let table = &mut *guard;

        let queue = table.queues.entry(key.to_string()).or_default();
        while let Some(oldest) = queue.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                queue.pop_front();
            } else {
                break;
            }
        }

        let allowed = queue.len() < self.threshold as usize;
        if allowed {
            queue.push_back(now);
        } else if queue.is_empty() {
            table.queues.remove(key);
        }

        if table.queues.len() >= table.sweep_at {
            table.queues.retain(|_, queue| !self.is_stale(queue, now));
            table.sweep_at = (table.queues.len() * 2).max(SWEEP_FLOOR);
            tracing::debug!(
                tracked_keys = table.queues.len(),
                "Swept stale rate limit windows"
            );
        }

        Ok(allowed)
    }
}

//! Redis-based sliding window limiter

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use wb_core::{DomainError, RateLimiter};
use wb_shared::config::WindowLimit;

use crate::cache::lua::{slide_window_outcome, SLIDE_WINDOW};
use crate::cache::RedisClient;

/// One script call per event: trim, count, record. Atomic across instances.
pub struct RedisRateLimiter {
    client: RedisClient,
    window_ms: u64,
    threshold: u32,
}

impl RedisRateLimiter {
    pub fn new(client: RedisClient, limit: &WindowLimit) -> Self {
        Self {
            client,
            window_ms: limit.window_ms,
            threshold: limit.threshold,
        }
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn allow(&self, key: &str) -> Result<bool, DomainError> {
        let now_ms = Utc::now().timestamp_millis();
        // Two events in the same millisecond must stay distinct members
        let member = format!("{}-{}", now_ms, Uuid::new_v4().simple());

        let mut invocation = SLIDE_WINDOW.prepare_invoke();
        invocation
            .key(self.client.key(key))
            .arg(self.window_ms)
            .arg(self.threshold)
            .arg(now_ms)
            .arg(member);

        let reply = self.client.run_script("slide_window", &invocation).await?;
        slide_window_outcome(reply)
    }
}

//! SMS gateway decorator guarded by a rate limiter

use std::sync::Arc;

use async_trait::async_trait;
use wb_shared::config::FailurePolicy;

use crate::errors::{DomainError, RateLimitError};
use crate::services::verification::SmsSender;

use super::traits::{allow_with_policy, RateLimiter};

/// Wraps an [`SmsSender`] so every dispatch first passes the limiter.
///
/// All instances share one limiter key, which caps the total outbound
/// traffic to the gateway rather than per-recipient traffic.
pub struct RateLimitedSmsSender {
    inner: Arc<dyn SmsSender>,
    limiter: Arc<dyn RateLimiter>,
    key: String,
    policy: FailurePolicy,
}

impl RateLimitedSmsSender {
    pub fn new(
        inner: Arc<dyn SmsSender>,
        limiter: Arc<dyn RateLimiter>,
        key: impl Into<String>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            inner,
            limiter,
            key: key.into(),
            policy,
        }
    }
}

#[async_trait]
impl SmsSender for RateLimitedSmsSender {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), DomainError> {
        if !allow_with_policy(self.limiter.as_ref(), &self.key, self.policy).await? {
            tracing::warn!(
                key = %self.key,
                event = "sms_rate_limited",
                "Outbound SMS rate limit reached"
            );
            return Err(RateLimitError::Limited {
                key: self.key.clone(),
            }
            .into());
        }

        self.inner.send(template_id, args, recipients).await
    }
}

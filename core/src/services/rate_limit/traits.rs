//! Rate limiter trait and failure policy application

use async_trait::async_trait;
use wb_shared::config::FailurePolicy;

use crate::errors::DomainError;

/// A sliding-window limiter shared by every caller of a key.
///
/// Each call records one event under `key` and answers whether the events
/// inside the trailing window, this one included, stay within the
/// threshold. Window length and threshold belong to the limiter instance.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// `Ok(true)` when the event is admitted, `Ok(false)` when limited
    async fn allow(&self, key: &str) -> Result<bool, DomainError>;
}

/// Ask `limiter` about `key`, resolving limiter faults with `policy`.
///
/// - `FailOpen`: a fault admits the event and is logged
/// - `FailClosed`: the fault is returned to the caller
pub async fn allow_with_policy(
    limiter: &dyn RateLimiter,
    key: &str,
    policy: FailurePolicy,
) -> Result<bool, DomainError> {
    match limiter.allow(key).await {
        Ok(allowed) => Ok(allowed),
        Err(e) if policy.allows_on_error() => {
            tracing::error!(
                key = key,
                error = %e,
                event = "rate_limiter_unavailable",
                policy = "fail_open",
                "Rate limiter failed, admitting request"
            );
            Ok(true)
        }
        Err(e) => {
            tracing::error!(
                key = key,
                error = %e,
                event = "rate_limiter_unavailable",
                policy = "fail_closed",
                "Rate limiter failed, rejecting request"
            );
            Err(e)
        }
    }
}

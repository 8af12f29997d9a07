//! Rate limiting configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// What a limiter does when its backing store cannot answer.
///
/// There is no `Default`: every call site states its choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Treat the request as allowed
    FailOpen,
    /// Treat the request as limited
    FailClosed,
}

impl FailurePolicy {
    /// Decision to apply when the limiter itself failed
    pub fn allows_on_error(self) -> bool {
        matches!(self, FailurePolicy::FailOpen)
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail_open" | "open" => Ok(FailurePolicy::FailOpen),
            "fail_closed" | "closed" => Ok(FailurePolicy::FailClosed),
            _ => Err(format!("Invalid failure policy: {}", s)),
        }
    }
}

/// One sliding window: at most `threshold` events per `window_ms`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowLimit {
    /// Window length in milliseconds
    pub window_ms: u64,

    /// Events admitted per window
    pub threshold: u32,

    /// Decision when the backing store errors or times out
    pub failure_policy: FailurePolicy,
}

/// Outbound SMS guard
///
/// Switched independently of the inbound limit: turning off per-IP limiting
/// leaves the gateway protected.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsRateLimit {
    /// Wrap the gateway in the limiter
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Limiter key shared by every instance dispatching SMS
    pub key: String,

    #[serde(flatten)]
    pub limit: WindowLimit,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Enable inbound (per-IP) rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Inbound limit applied per client IP
    pub api: WindowLimit,

    /// Outbound limit in front of the SMS gateway
    pub sms: SmsRateLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api: WindowLimit {
                window_ms: 1000,
                threshold: 100,
                failure_policy: FailurePolicy::FailOpen,
            },
            sms: SmsRateLimit {
                enabled: default_enabled(),
                key: String::from("send:sms"),
                limit: WindowLimit {
                    window_ms: 1000,
                    threshold: 50,
                    failure_policy: FailurePolicy::FailClosed,
                },
            },
        }
    }
}

impl RateLimitConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            enabled: env_or("RATE_LIMIT_ENABLED", defaults.enabled)?,
            api: WindowLimit {
                window_ms: env_or("RATE_LIMIT_API_WINDOW_MS", defaults.api.window_ms)?,
                threshold: env_or("RATE_LIMIT_API_THRESHOLD", defaults.api.threshold)?,
                failure_policy: env_or(
                    "RATE_LIMIT_API_FAILURE_POLICY",
                    defaults.api.failure_policy,
                )?,
            },
            sms: SmsRateLimit {
                enabled: env_or("RATE_LIMIT_SMS_ENABLED", defaults.sms.enabled)?,
                key: env_or("RATE_LIMIT_SMS_KEY", defaults.sms.key)?,
                limit: WindowLimit {
                    window_ms: env_or("RATE_LIMIT_SMS_WINDOW_MS", defaults.sms.limit.window_ms)?,
                    threshold: env_or("RATE_LIMIT_SMS_THRESHOLD", defaults.sms.limit.threshold)?,
                    failure_policy: env_or(
                        "RATE_LIMIT_SMS_FAILURE_POLICY",
                        defaults.sms.limit.failure_policy,
                    )?,
                },
            },
        })
    }

    /// Create a development configuration (more lenient limits)
    pub fn development() -> Self {
        let mut config = Self::default();
        config.api.threshold = 300;
        config
    }
}

fn default_enabled() -> bool {
    true
}

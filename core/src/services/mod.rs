//! Business services containing domain logic and use cases.

pub mod rate_limit;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use rate_limit::{allow_with_policy, FailurePolicy, RateLimitedSmsSender, RateLimiter};
pub use token::{TokenService, TokenServiceConfig};
pub use verification::{CodeService, CodeServiceConfig, SmsSender};

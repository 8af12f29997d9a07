//! Sliding-window rate limiting
//!
//! The limiter itself is a trait implemented by the infrastructure layer
//! (Redis script or in-process window). This module adds what every caller
//! needs on top of it:
//! - applying an explicit [`FailurePolicy`] when the limiter cannot answer
//! - an SMS gateway decorator that consults the limiter before dispatch

mod sms_guard;
mod traits;

#[cfg(test)]
mod tests;

pub use sms_guard::RateLimitedSmsSender;
pub use traits::{allow_with_policy, RateLimiter};
pub use wb_shared::config::FailurePolicy;

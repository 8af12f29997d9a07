//! Sliding-window rate limiters
//!
//! [`RedisRateLimiter`] is shared by every instance pointing at the same
//! Redis; [`MemoryRateLimiter`] counts for this process only.

mod memory;
mod redis_limiter;


pub use memory::MemoryRateLimiter;
pub use redis_limiter::RedisRateLimiter;

//! Session liveness stores

mod memory;
mod redis_store;

pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;

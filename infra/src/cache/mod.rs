//! Cache module: the Redis client and the verification code stores
//!
//! Two interchangeable [`wb_core::CodeStore`] implementations live here:
//! [`RedisCodeStore`] for shared deployments and [`LocalCodeStore`] for a
//! single process.

pub mod local_code_store;
pub(crate) mod lua;
pub mod redis_client;
pub mod redis_code_store;


pub use local_code_store::LocalCodeStore;
pub use redis_client::RedisClient;
pub use redis_code_store::RedisCodeStore;

// Re-export commonly used types
pub use wb_shared::config::CacheConfig;

//! Shared utilities and common types for the Webook auth server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the process environment
//! - The `{code, msg, data}` response envelope and result codes
//! - Phone number validation and masking

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthPathConfig, CacheConfig, CodeStoreBackend, ConfigError, Environment,
    FailurePolicy, JwtConfig, LoggingConfig, MemoryCacheConfig, RateLimitConfig, ServerConfig,
    VerificationConfig, WindowLimit,
};
pub use errors::{error_codes, messages, result_codes};
pub use types::{ApiResponse, ErrorBody, HealthResponse};
pub use utils::phone;

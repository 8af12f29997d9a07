//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `auth` - JWT signing/lifetimes and the authentication allow-list
//! - `cache` - Redis connection and the process-local code store
//! - `environment` - Environment detection and logging configuration
//! - `rate_limit` - Sliding-window limits and their failure policies
//! - `server` - HTTP bind address
//! - `verification` - One-time code lifetime, cooldown and attempt budget
//!
//! Every section is read from environment variables (a `.env` file is loaded
//! by the binary with `dotenvy` before `AppConfig::from_env` runs).

pub mod auth;
pub mod cache;
pub mod environment;
pub mod rate_limit;
pub mod server;
pub mod verification;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AuthPathConfig, JwtConfig};
pub use cache::{CacheConfig, CodeStoreBackend, MemoryCacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{FailurePolicy, RateLimitConfig, SmsRateLimit, WindowLimit};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Errors raised while assembling configuration at startup.
///
/// These are the only errors allowed to abort the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Process-local code store configuration
    #[serde(default)]
    pub memory_cache: MemoryCacheConfig,

    /// Verification code configuration
    pub verification: VerificationConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Authentication allow-list
    #[serde(default)]
    pub auth_paths: AuthPathConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            memory_cache: MemoryCacheConfig::default(),
            verification: VerificationConfig::default(),
            jwt: JwtConfig::development(),
            auth_paths: AuthPathConfig::default(),
            rate_limit: RateLimitConfig::development(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Load configuration from environment
    ///
    /// In production a missing `JWT_SECRET` is a hard error; every other value
    /// falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let logging = LoggingConfig::for_environment(environment).with_env_overrides();

        Ok(Self {
            environment,
            server: ServerConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            memory_cache: MemoryCacheConfig::from_env()?,
            verification: VerificationConfig::from_env()?,
            jwt: JwtConfig::from_env(environment)?,
            auth_paths: AuthPathConfig::from_env(),
            rate_limit: RateLimitConfig::from_env()?,
            logging,
        })
    }
}

/// Read an optional environment variable, parsing it into `T`.
///
/// Unset variables yield `default`; set but unparsable ones are an error so a
/// typo never silently turns into a default.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

//! Cache configuration module

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// Redis connection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Upper bound for a single command or script round-trip, in milliseconds
    pub operation_timeout_ms: u64,

    /// Connect attempts before giving up at startup
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,

    /// Optional prefix prepended to every key
    #[serde(default)]
    pub key_prefix: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            operation_timeout_ms: 500,
            connect_retries: default_connect_retries(),
            key_prefix: None,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            url: env_or("REDIS_URL", defaults.url)?,
            connection_timeout: env_or("REDIS_CONNECTION_TIMEOUT", defaults.connection_timeout)?,
            operation_timeout_ms: env_or(
                "REDIS_OPERATION_TIMEOUT_MS",
                defaults.operation_timeout_ms,
            )?,
            connect_retries: env_or("REDIS_CONNECT_RETRIES", defaults.connect_retries)?,
            key_prefix: std::env::var("REDIS_KEY_PREFIX").ok().filter(|p| !p.is_empty()),
        })
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// Which implementation backs the verification code store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeStoreBackend {
    /// Shared Redis store, safe across instances
    Redis,
    /// Process-local table, single instance only
    Local,
}

impl std::str::FromStr for CodeStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CodeStoreBackend::Redis),
            "local" | "memory" => Ok(CodeStoreBackend::Local),
            _ => Err(format!("Invalid code store backend: {}", s)),
        }
    }
}

/// In-memory cache configuration (for development/testing)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of resident keys before LRU eviction
    pub max_entries: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { max_entries: 200 }
    }
}

impl MemoryCacheConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            max_entries: env_or("LOCAL_CACHE_MAX_ENTRIES", Self::default().max_entries)?,
        })
    }
}

fn default_connect_retries() -> u32 {
    3
}

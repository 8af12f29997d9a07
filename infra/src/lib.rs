//! # Infrastructure Layer
//!
//! Concrete implementations of the storage and gateway traits declared in
//! `wb_core`.
//!
//! ## Architecture
//!
//! - **Cache**: Redis client plus the two verification code stores (Redis
//!   scripts and the process-local fallback)
//! - **Session**: session liveness in Redis or in memory
//! - **Rate limit**: sliding-window limiters in Redis or in memory
//! - **SMS**: the mock gateway used in development and tests
//! - **Users**: in-memory phone to account directory
//!
//! [`InfrastructureServices`] wires one implementation of each seam from an
//! [`AppConfig`]; callers only ever see the traits.

use std::sync::Arc;

use wb_core::{CodePolicy, CodeStore, DomainError, RateLimiter, SessionStore, StoreError};
use wb_shared::config::{AppConfig, CodeStoreBackend};

pub mod cache;
pub mod rate_limit;
pub mod session;
pub mod sms;
pub mod users;

use cache::{LocalCodeStore, RedisClient, RedisCodeStore};
use rate_limit::{MemoryRateLimiter, RedisRateLimiter};
use session::{MemorySessionStore, RedisSessionStore};

/// Infrastructure service container
///
/// Every field is a trait object; whether Redis or the process backs it is
/// decided once, here.
#[derive(Clone)]
pub struct InfrastructureServices {
    pub code_store: Arc<dyn CodeStore>,
    pub sessions: Arc<dyn SessionStore>,
    /// Inbound, per-caller limiter
    pub api_limiter: Arc<dyn RateLimiter>,
    /// Outbound limiter in front of the SMS gateway
    pub sms_limiter: Arc<dyn RateLimiter>,
    /// Present when the services are backed by Redis; used for health checks
    pub redis: Option<RedisClient>,
}

impl InfrastructureServices {
    /// Process-local services for single-instance development and tests
    pub fn in_memory(config: &AppConfig) -> Self {
        let policy = CodePolicy::from(&config.verification);
        let limits = &config.rate_limit;
        Self {
            code_store: Arc::new(LocalCodeStore::new(policy, config.memory_cache.max_entries)),
            sessions: Arc::new(MemorySessionStore::new()),
            api_limiter: Arc::new(MemoryRateLimiter::new(&limits.api)),
            sms_limiter: Arc::new(MemoryRateLimiter::new(&limits.sms.limit)),
            redis: None,
        }
    }
}

/// Connect to Redis and build the shared services
///
/// The code store uses the process-local table instead when
/// `CODE_STORE_BACKEND=local`; sessions and limiters always live in Redis
/// so that every instance agrees on them.
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let client = RedisClient::new(config.cache.clone()).await?;
    let policy = CodePolicy::from(&config.verification);

    let code_store: Arc<dyn CodeStore> = match config.verification.backend {
        CodeStoreBackend::Redis => Arc::new(RedisCodeStore::new(client.clone(), policy)),
        CodeStoreBackend::Local => {
            tracing::warn!(
                max_entries = config.memory_cache.max_entries,
                "Using the process-local code store; codes are not shared between instances"
            );
            Arc::new(LocalCodeStore::new(policy, config.memory_cache.max_entries))
        }
    };

    let limits = &config.rate_limit;
    let services = InfrastructureServices {
        code_store,
        sessions: Arc::new(RedisSessionStore::new(client.clone())),
        api_limiter: Arc::new(RedisRateLimiter::new(client.clone(), &limits.api)),
        sms_limiter: Arc::new(RedisRateLimiter::new(client.clone(), &limits.sms.limit)),
        redis: Some(client),
    };

    tracing::info!(
        code_store = ?config.verification.backend,
        "Infrastructure services initialized successfully"
    );
    Ok(services)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A store operation failed after the client was up
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Store(e) => DomainError::Store(e),
            InfrastructureError::Cache(e) => DomainError::Store(StoreError::Backend {
                message: e.to_string(),
            }),
            InfrastructureError::Config(message) => DomainError::Internal { message },
        }
    }
}

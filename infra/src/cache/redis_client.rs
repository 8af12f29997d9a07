//! Redis cache client implementation
//!
//! A thin wrapper over one multiplexed connection. Every command and script
//! runs under a deadline taken from [`CacheConfig`]; a missed deadline is a
//! [`StoreError::Timeout`] and is never retried. Only the initial connect
//! retries, with exponential backoff.

use std::future::Future;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisResult, ScriptInvocation};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};
use wb_core::StoreError;
use wb_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Base delay between connect attempts
const CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Redis client with per-operation deadlines
///
/// Cloning is cheap: clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Deadline applied to each operation
    operation_timeout: Duration,
}

impl RedisClient {
    /// Connect using `config`, retrying `config.connect_retries` times
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        let max_retries = config.connect_retries.max(1);
        Self::new_with_retry_config(config, max_retries, CONNECT_RETRY_DELAY_MS).await
    }

    /// Connect with a custom retry configuration
    ///
    /// # Arguments
    /// * `config` - Cache configuration settings
    /// * `max_retries` - Maximum number of connect attempts
    /// * `retry_delay_ms` - Base delay between attempts in milliseconds
    pub async fn new_with_retry_config(
        config: CacheConfig,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            operation_timeout_ms = config.operation_timeout_ms,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connect_timeout = Duration::from_secs(config.connection_timeout.max(1));
        let connection =
            Self::create_connection_with_retry(client, max_retries, retry_delay_ms, connect_timeout)
                .await?;

        info!("Redis client created successfully");

        let operation_timeout = config.operation_timeout();
        Ok(Self {
            connection,
            config,
            operation_timeout,
        })
    }

    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result = match timeout(connect_timeout, client.get_multiplexed_async_connection()).await {
                Ok(result) => result,
                Err(_) => Err(redis::RedisError::from((
                    redis::ErrorKind::IoError,
                    "connect timed out",
                ))),
            };

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// A client sharing this connection with a different per-operation
    /// deadline
    pub fn with_timeout(&self, operation_timeout: Duration) -> Self {
        Self {
            operation_timeout,
            ..self.clone()
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Apply the configured key prefix
    pub fn key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// Run a prepared script invocation that replies with an integer status
    ///
    /// The script executes atomically on the server; a timeout here means the
    /// reply was not seen, not that the script ran partially.
    pub async fn run_script(
        &self,
        operation: &'static str,
        invocation: &ScriptInvocation<'_>,
    ) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        self.execute(operation, invocation.invoke_async::<_, i64>(&mut conn))
            .await
    }

    /// Set a string value that expires after `ttl` (whole seconds, at least one)
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let seconds = ttl.as_secs().max(1);
        self.execute("set_with_expiry", conn.set_ex::<_, _, ()>(key, value, seconds))
            .await
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        self.execute("exists", conn.exists::<_, bool>(key)).await
    }

    /// Delete a key; `true` only for the caller whose command removed it
    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        let deleted: u32 = self.execute("delete", conn.del::<_, u32>(key)).await?;
        Ok(deleted > 0)
    }

    /// Check if the Redis connection is healthy
    ///
    /// Performs a PING command to verify connectivity.
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        let response: String = self
            .execute("ping", redis::cmd("PING").query_async::<_, String>(&mut conn))
            .await?;
        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    async fn execute<T, F>(&self, operation: &'static str, command: F) -> Result<T, StoreError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match timeout(self.operation_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(operation = operation, error = %e, "Redis operation failed");
                Err(StoreError::Backend {
                    message: e.to_string(),
                })
            }
            Err(_) => {
                warn!(
                    operation = operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Redis operation timed out"
                );
                Err(StoreError::Timeout { operation })
            }
        }
    }
}

/// Mask sensitive parts of Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}

//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0, // Use all CPU cores
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_or("SERVER_HOST", defaults.host)?,
            port: env_or("SERVER_PORT", defaults.port)?,
            workers: env_or("SERVER_WORKERS", defaults.workers)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        assert_eq!(ServerConfig::new("127.0.0.1", 9000).bind_address(), "127.0.0.1:9000");
        assert_eq!(ServerConfig::default().bind_address(), "0.0.0.0:8080");
    }
}

//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::{env_or, ConfigError, Environment};

const DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify both token kinds
    #[serde(skip_serializing)]
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token (and server-side session) lifetime in seconds
    pub refresh_token_expiry: i64,

    /// When an access token has fewer seconds than this left, a replacement
    /// is minted during validation
    pub renewal_threshold: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            renewal_threshold: 10,
            issuer: String::from("webook"),
            audience: String::from("webook-api"),
        }
    }

    /// Configuration with a well-known secret, for local development only
    pub fn development() -> Self {
        Self::new(DEVELOPMENT_SECRET)
    }

    /// Create from environment variables
    ///
    /// Production refuses to start without `JWT_SECRET`.
    pub fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => DEVELOPMENT_SECRET.to_string(),
        };

        let defaults = Self::new(secret);
        Ok(Self {
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry)?,
            refresh_token_expiry: env_or(
                "JWT_REFRESH_TOKEN_EXPIRY",
                defaults.refresh_token_expiry,
            )?,
            renewal_threshold: env_or("JWT_RENEWAL_THRESHOLD", defaults.renewal_threshold)?,
            issuer: env_or("JWT_ISSUER", defaults.issuer.clone())?,
            ..defaults
        })
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using the development secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

/// Paths that bypass the JWT middleware
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthPathConfig {
    pub ignore_paths: Vec<String>,
}

impl Default for AuthPathConfig {
    fn default() -> Self {
        Self {
            ignore_paths: vec![
                String::from("/users/login_sms/code/send"),
                String::from("/users/login_sms"),
                String::from("/users/refresh_token"),
                String::from("/health"),
            ],
        }
    }
}

impl AuthPathConfig {
    /// Defaults, extended with the comma-separated `AUTH_IGNORE_PATHS`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(extra) = std::env::var("AUTH_IGNORE_PATHS") {
            config.ignore_paths.extend(
                extra
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from),
            );
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.renewal_threshold, 10);
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_default_ignore_paths_cover_login_flow() {
        let config = AuthPathConfig::default();
        assert!(config.ignore_paths.iter().any(|p| p == "/users/login_sms"));
        assert!(config.ignore_paths.iter().any(|p| p == "/users/login_sms/code/send"));
        assert!(!config.ignore_paths.iter().any(|p| p == "/users/profile"));
    }
}

//! Configuration for the token service

use jsonwebtoken::Algorithm;
use wb_shared::config::JwtConfig;

use crate::domain::entities::token::{
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token and session lifetime in seconds
    pub refresh_token_expiry_seconds: i64,
    /// Renew an access token when fewer seconds than this remain
    pub renewal_threshold_seconds: i64,
    /// JWT issuer claim
    pub issuer: String,
    /// JWT audience claim
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_seconds: ACCESS_TOKEN_EXPIRY_MINUTES * 60,
            refresh_token_expiry_seconds: REFRESH_TOKEN_EXPIRY_DAYS * 86400,
            renewal_threshold_seconds: 10,
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            algorithm: Algorithm::HS256,
            access_token_expiry_seconds: config.access_token_expiry,
            refresh_token_expiry_seconds: config.refresh_token_expiry,
            renewal_threshold_seconds: config.renewal_threshold,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}

//! Verification code configuration

use serde::{Deserialize, Serialize};

use super::{env_or, CodeStoreBackend, ConfigError};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// How long an issued code stays verifiable, in seconds
    pub code_ttl_seconds: u64,

    /// Minimum time between two codes for the same scenario and phone
    pub resend_cooldown_seconds: u64,

    /// Wrong guesses allowed per issued code
    pub max_attempts: u32,

    /// Template id passed to the SMS gateway
    pub sms_template_id: String,

    /// Where codes are kept
    pub backend: CodeStoreBackend,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 600,
            resend_cooldown_seconds: 60,
            max_attempts: 3,
            sms_template_id: String::from("1877556"),
            backend: CodeStoreBackend::Redis,
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            code_ttl_seconds: env_or("CODE_TTL_SECONDS", defaults.code_ttl_seconds)?,
            resend_cooldown_seconds: env_or(
                "CODE_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            )?,
            max_attempts: env_or("CODE_MAX_ATTEMPTS", defaults.max_attempts)?,
            sms_template_id: env_or("SMS_TEMPLATE_ID", defaults.sms_template_id)?,
            backend: env_or("CODE_STORE_BACKEND", defaults.backend)?,
        };

        // A cooldown longer than the lifetime would lock a phone out after expiry.
        if config.resend_cooldown_seconds > config.code_ttl_seconds {
            return Err(ConfigError::Invalid {
                key: "CODE_RESEND_COOLDOWN_SECONDS",
                value: config.resend_cooldown_seconds.to_string(),
            });
        }
        Ok(config)
    }
}

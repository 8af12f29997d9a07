//! Verification code entity for SMS-based login.

use std::time::Duration;

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use tokio::time::Instant;
use wb_shared::config::VerificationConfig;

use crate::errors::CodeError;

/// Number of verification attempts granted per issued code
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Lifetime of an issued code (10 minutes)
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 600;

/// Minimum time between two codes for the same key (1 minute)
pub const RESEND_COOLDOWN_SECONDS: u64 = 60;

/// Lifetime, cooldown and attempt budget shared by every code store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePolicy {
    pub ttl: Duration,
    pub cooldown: Duration,
    pub max_attempts: u32,
}

impl Default for CodePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_EXPIRATION_SECONDS),
            cooldown: Duration::from_secs(RESEND_COOLDOWN_SECONDS),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl From<&VerificationConfig> for CodePolicy {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.code_ttl_seconds),
            cooldown: Duration::from_secs(config.resend_cooldown_seconds),
            max_attempts: config.max_attempts,
        }
    }
}

/// Generates a uniformly random, zero-padded 6-digit code from the OS RNG
pub fn generate_code() -> String {
    let num: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", num, width = CODE_LENGTH)
}

/// `true` when `code` has the shape of an issued code (exactly six ASCII digits)
pub fn is_well_formed(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

/// A code held by a process-local store.
///
/// The shared store keeps the same three facts in a Redis hash and applies the
/// same transitions inside its scripts; this type is the in-process rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    /// The 6-digit code
    pub code: String,

    /// When the code was issued
    pub issued_at: Instant,

    /// When the code stops being verifiable
    pub expires_at: Instant,

    /// Wrong guesses left; zero means the challenge is closed
    pub remaining_attempts: u32,
}

impl VerificationCode {
    /// Issue `code` at `now` under `policy`
    pub fn issue(code: impl Into<String>, now: Instant, policy: &CodePolicy) -> Self {
        Self {
            code: code.into(),
            issued_at: now,
            expires_at: now + policy.ttl,
            remaining_attempts: policy.max_attempts,
        }
    }

    /// Checks if the code has expired
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Whether a replacement is still blocked by the resend cooldown
    pub fn in_cooldown(&self, now: Instant, cooldown: Duration) -> bool {
        now.saturating_duration_since(self.issued_at) < cooldown
    }

    /// Check `input` against the stored code, consuming one attempt on a miss.
    ///
    /// A match closes the challenge (no attempts left), so the same code can
    /// only ever be accepted once.
    pub fn check(&mut self, input: &str) -> Result<bool, CodeError> {
        if self.remaining_attempts == 0 {
            return Err(CodeError::TooManyAttempts);
        }

        if constant_time_eq(self.code.as_bytes(), input.as_bytes()) {
            self.remaining_attempts = 0;
            Ok(true)
        } else {
            self.remaining_attempts -= 1;
            Ok(false)
        }
    }
}

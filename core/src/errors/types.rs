//! Error types for verification codes, tokens, storage and rate limiting

use thiserror::Error;

/// Verification code errors
///
/// These are user-facing outcomes, not faults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Verification code sent too frequently")]
    SendTooFrequent,

    #[error("Too many verification attempts")]
    TooManyAttempts,

    /// No live code for the scenario and phone (never sent, or expired)
    #[error("No verification code issued")]
    NotFound,

    #[error("Verification code must be {expected} digits")]
    InvalidFormat { expected: usize },
}

/// Token-related errors
///
/// All of them are answered with the same unauthorized response; the
/// distinction exists for logs and monitoring.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Invalid token format")]
    Malformed,

    #[error("Wrong token type")]
    WrongType,

    #[error("Token bound to another device")]
    DeviceMismatch,

    #[error("Session revoked")]
    Revoked,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Backing store faults
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store operation {operation} timed out")]
    Timeout { operation: &'static str },

    #[error("Store backend error: {message}")]
    Backend { message: String },

    /// The store answered, but with data no script or writer of ours produces
    #[error("Unexpected store reply for {operation}: {reply}")]
    UnexpectedReply { operation: &'static str, reply: i64 },
}

/// Rate limiting outcome surfaced as an error (outbound guards)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("Rate limit exceeded for {key}")]
    Limited { key: String },
}

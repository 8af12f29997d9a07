//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{CodeError, RateLimitError, StoreError, TokenError};

use thiserror::Error;

/// Core domain errors
///
/// Every fallible operation in the domain returns this type. The variants
/// fall into four classes that callers treat differently:
/// - input validation (`Validation`)
/// - contention and policy (`Code`, `RateLimit`), expected and never logged
///   as faults
/// - security violations (`Token`), all answered with the same unauthorized
///   outcome
/// - system faults (`Store`, `Sms`, `Internal`)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("SMS gateway failure: {message}")]
    Sms { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Code(#[from] CodeError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

impl DomainError {
    /// Contention, policy or input errors: the caller may retry later
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. } | DomainError::Code(_) | DomainError::RateLimit(_)
        )
    }

    /// Bad signature, expiry, device mismatch or revoked session
    pub fn is_security_violation(&self) -> bool {
        matches!(self, DomainError::Token(_))
    }

    /// Backing store, gateway or internal fault
    pub fn is_system_error(&self) -> bool {
        matches!(
            self,
            DomainError::Internal { .. } | DomainError::Sms { .. } | DomainError::Store(_)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

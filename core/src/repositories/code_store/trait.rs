//! Code store trait: atomic storage of one-time codes with cooldown and
//! attempt accounting.

use async_trait::async_trait;

use crate::domain::value_objects::CodeKey;
use crate::errors::DomainError;

/// Storage for verification codes, keyed by scenario and phone number.
///
/// Both operations are atomic per key: concurrent `set`/`verify` calls on
/// the same key behave as if they ran one after another. Implementations
/// are interchangeable and callers never know which one they hold.
///
/// # Errors
/// - `CodeError::SendTooFrequent` from `set` while the live code is still in
///   its resend cooldown
/// - `CodeError::TooManyAttempts` from `verify` once the attempt budget is
///   spent or the code was already accepted
/// - `CodeError::NotFound` from `verify` when no live code exists
/// - `StoreError::*` for backing store faults and timeouts
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store `code` for `key`, replacing a previous code only once its
    /// cooldown has passed. Resets the attempt budget.
    async fn set(&self, key: &CodeKey, code: &str) -> Result<(), DomainError>;

    /// Compare `input_code` with the stored code.
    ///
    /// Returns `Ok(true)` on a match (which closes the challenge) and
    /// `Ok(false)` on a miss (which consumes one attempt).
    async fn verify(&self, key: &CodeKey, input_code: &str) -> Result<bool, DomainError>;
}

//! Session store trait defining server-side session liveness.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::SessionState;
use crate::errors::DomainError;

/// Repository of live session ids.
///
/// Only liveness is stored: the presence of a session id means tokens bound
/// to it may be accepted. A session disappears when revoked or when its
/// lifetime (the refresh token lifetime) runs out.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record `session_id` as active for `subject` during `ttl`
    async fn create(
        &self,
        session_id: &str,
        subject: &str,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Current state of `session_id`; unknown ids are `Revoked`
    async fn state(&self, session_id: &str) -> Result<SessionState, DomainError>;

    /// Revoke `session_id`.
    ///
    /// Returns `true` only for the one caller that moved the session from
    /// `Active` to `Revoked`; every later or concurrent caller gets `false`.
    /// Refresh rotation relies on this to be single-use.
    async fn revoke(&self, session_id: &str) -> Result<bool, DomainError>;
}

//! Server-side session liveness.
//!
//! A session is only an id whose presence in the store means "accept tokens
//! bound to me". Tokens themselves are never stored.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifecycle: `Active -> Revoked`, terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    /// Logged out, rotated away, force-revoked or expired
    Revoked,
}

impl SessionState {
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::Active)
    }
}

/// Creates a new random session id
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Key under which a session's liveness flag lives in the shared store
pub fn session_key(session_id: &str) -> String {
    format!("session:{}", session_id)
}

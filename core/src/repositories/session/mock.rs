//! Mock implementation of SessionStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::entities::SessionState;
use crate::errors::{DomainError, StoreError};

use super::r#trait::SessionStore;

/// Mock session store; ignores lifetimes
#[derive(Clone, Default)]
pub struct MockSessionStore {
    sessions: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
    reject_creates: Arc<AtomicBool>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Fail `create` only; lookups and revokes keep working
    pub fn set_reject_creates(&self, reject: bool) {
        self.reject_creates.store(reject, Ordering::SeqCst);
    }

    /// Number of active sessions
    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                message: "session store unavailable".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn create(
        &self,
        session_id: &str,
        subject: &str,
        _ttl: Duration,
    ) -> Result<(), DomainError> {
        self.check()?;
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                message: "session write rejected".to_string(),
            }
            .into());
        }
        self.sessions
            .lock()
            .await
            .insert(session_id.to_string(), subject.to_string());
        Ok(())
    }

    async fn state(&self, session_id: &str) -> Result<SessionState, DomainError> {
        self.check()?;
        Ok(if self.sessions.lock().await.contains_key(session_id) {
            SessionState::Active
        } else {
            SessionState::Revoked
        })
    }

    async fn revoke(&self, session_id: &str) -> Result<bool, DomainError> {
        self.check()?;
        Ok(self.sessions.lock().await.remove(session_id).is_some())
    }
}

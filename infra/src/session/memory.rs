//! In-process session store

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use wb_core::{DomainError, SessionState, SessionStore};

/// Sessions held by this process; lost on restart
///
/// Only the expiry of each session id is kept.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Instant>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions that are still live
    pub async fn active_count(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .lock()
            .await
            .values()
            .filter(|expires_at| **expires_at > now)
            .count()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(
        &self,
        session_id: &str,
        _subject: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(session_id.to_string(), now + ttl);
        Ok(())
    }

    async fn state(&self, session_id: &str) -> Result<SessionState, DomainError> {
        let now = Instant::now();
        let live = self
            .sessions
            .lock()
            .await
            .get(session_id)
            .map_or(false, |expires_at| *expires_at > now);
        Ok(if live {
            SessionState::Active
        } else {
            SessionState::Revoked
        })
    }

    async fn revoke(&self, session_id: &str) -> Result<bool, DomainError> {
        let now = Instant::now();
        Ok(self
            .sessions
            .lock()
            .await
            .remove(session_id)
            .map_or(false, |expires_at| expires_at > now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_session_lifecycle() {
        let store = MemorySessionStore::new();
        store
            .create("sid-1", "42", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.state("sid-1").await.unwrap(), SessionState::Active);

        assert!(store.revoke("sid-1").await.unwrap());
        assert!(!store.revoke("sid-1").await.unwrap());
        assert_eq!(store.state("sid-1").await.unwrap(), SessionState::Revoked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_expire() {
        let store = MemorySessionStore::new();
        store
            .create("sid-1", "42", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(store.state("sid-1").await.unwrap(), SessionState::Revoked);
        assert!(!store.revoke("sid-1").await.unwrap());
        assert_eq!(store.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_revoked() {
        let store = MemorySessionStore::new();
        assert_eq!(store.state("nope").await.unwrap(), SessionState::Revoked);
    }
}

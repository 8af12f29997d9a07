//! Sessions as `session:{sid}` keys in Redis

use std::time::Duration;

use async_trait::async_trait;
use wb_core::{session_key, DomainError, SessionState, SessionStore};

use crate::cache::RedisClient;

/// The key holds the subject id and expires with the refresh token.
/// `DEL` returns how many keys it removed, which is what makes revocation
/// answer `true` to exactly one caller.
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, session_id: &str) -> String {
        self.client.key(&session_key(session_id))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(
        &self,
        session_id: &str,
        subject: &str,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(&self.key(session_id), subject, ttl)
            .await?;
        Ok(())
    }

    async fn state(&self, session_id: &str) -> Result<SessionState, DomainError> {
        Ok(if self.client.exists(&self.key(session_id)).await? {
            SessionState::Active
        } else {
            SessionState::Revoked
        })
    }

    async fn revoke(&self, session_id: &str) -> Result<bool, DomainError> {
        Ok(self.client.delete(&self.key(session_id)).await?)
    }
}

//! Verification code store backed by Redis scripts
//!
//! Each operation is one script call, so concurrent senders and verifiers on
//! the same key are linearized by Redis itself, across every instance.

use async_trait::async_trait;
use wb_core::{CodeKey, CodePolicy, CodeStore, DomainError};

use super::lua::{set_code_outcome, verify_code_outcome, SET_CODE, VERIFY_CODE};
use super::redis_client::RedisClient;

pub struct RedisCodeStore {
    client: RedisClient,
    policy: CodePolicy,
}

impl RedisCodeStore {
    pub fn new(client: RedisClient, policy: CodePolicy) -> Self {
        Self { client, policy }
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(&self, key: &CodeKey, code: &str) -> Result<(), DomainError> {
        let mut invocation = SET_CODE.prepare_invoke();
        invocation
            .key(self.client.key(&key.to_string()))
            .arg(code)
            .arg(self.policy.ttl.as_millis() as u64)
            .arg(self.policy.cooldown.as_millis() as u64)
            .arg(self.policy.max_attempts);

        let reply = self.client.run_script("set_code", &invocation).await?;
        set_code_outcome(reply)
    }

    async fn verify(&self, key: &CodeKey, input_code: &str) -> Result<bool, DomainError> {
        let mut invocation = VERIFY_CODE.prepare_invoke();
        invocation
            .key(self.client.key(&key.to_string()))
            .arg(input_code);

        let reply = self.client.run_script("verify_code", &invocation).await?;
        verify_code_outcome(reply)
    }
}

//! Mock implementation of CodeStore for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::entities::{CodePolicy, VerificationCode};
use crate::domain::value_objects::CodeKey;
use crate::errors::{CodeError, DomainError, StoreError};

use super::r#trait::CodeStore;

/// Mock code store that can also be told to fail like a broken backend
#[derive(Clone, Default)]
pub struct MockCodeStore {
    codes: Arc<Mutex<HashMap<CodeKey, VerificationCode>>>,
    policy: CodePolicy,
    fail_with: Arc<Mutex<Option<StoreError>>>,
}

impl MockCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `error`
    pub async fn fail_with(&self, error: StoreError) {
        *self.fail_with.lock().await = Some(error);
    }

    /// The code currently stored for `key`
    pub async fn stored_code(&self, key: &CodeKey) -> Option<String> {
        self.codes.lock().await.get(key).map(|c| c.code.clone())
    }

    async fn check_failure(&self) -> Result<(), DomainError> {
        match self.fail_with.lock().await.clone() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CodeStore for MockCodeStore {
    async fn set(&self, key: &CodeKey, code: &str) -> Result<(), DomainError> {
        self.check_failure().await?;
        let now = Instant::now();
        let mut codes = self.codes.lock().await;
        if let Some(existing) = codes.get(key) {
            if !existing.is_expired(now) && existing.in_cooldown(now, self.policy.cooldown) {
                return Err(CodeError::SendTooFrequent.into());
            }
        }
        codes.insert(key.clone(), VerificationCode::issue(code, now, &self.policy));
        Ok(())
    }

    async fn verify(&self, key: &CodeKey, input_code: &str) -> Result<bool, DomainError> {
        self.check_failure().await?;
        let mut codes = self.codes.lock().await;
        match codes.get_mut(key) {
            Some(code) if !code.is_expired(Instant::now()) => Ok(code.check(input_code)?),
            _ => Err(CodeError::NotFound.into()),
        }
    }
}

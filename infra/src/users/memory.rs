//! In-memory user directory

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;
use wb_core::{DomainError, UserDirectory};

/// Assigns a fresh account id to each phone number the first time it logs in
#[derive(Default)]
pub struct MemoryUserDirectory {
    accounts: Mutex<HashMap<String, String>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_or_create_by_phone(&self, phone: &str) -> Result<String, DomainError> {
        let mut accounts = self.accounts.lock().await;
        let id = accounts
            .entry(phone.to_string())
            .or_insert_with(|| {
                let id = Uuid::new_v4().to_string();
                tracing::info!(user_id = %id, event = "user_created", "Registered new account");
                id
            })
            .clone();
        Ok(id)
    }
}

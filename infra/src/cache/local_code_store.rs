//! Process-local verification code store
//!
//! Fallback for single-instance deployments and development. One mutex
//! guards the whole table, which makes `set` and `verify` atomic per key the
//! same way the Redis scripts are. The table holds at most `max_entries`
//! codes; expired entries go first, then the least recently used.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use wb_core::{CodeError, CodeKey, CodePolicy, CodeStore, DomainError, VerificationCode};

struct Slot {
    code: VerificationCode,
    last_used: u64,
}

#[derive(Default)]
struct Table {
    slots: HashMap<String, Slot>,
    /// Monotonic use counter driving LRU order
    clock: u64,
}

impl Table {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Make room so that one more entry fits within `capacity`
    fn make_room(&mut self, capacity: usize, now: Instant) {
        if self.slots.len() < capacity {
            return;
        }

        self.slots.retain(|_, slot| !slot.code.is_expired(now));

        while self.slots.len() >= capacity {
            let oldest = self
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    tracing::debug!(key = %key, "Evicting least recently used code");
                    self.slots.remove(&key);
                }
                None => break,
            }
        }
    }
}

pub struct LocalCodeStore {
    table: Mutex<Table>,
    policy: CodePolicy,
    max_entries: usize,
}

impl LocalCodeStore {
    pub fn new(policy: CodePolicy, max_entries: usize) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            policy,
            max_entries: max_entries.max(1),
        }
    }

    /// Number of resident entries, expired ones included
    pub async fn len(&self) -> usize {
        self.table.lock().await.slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CodeStore for LocalCodeStore {
    async fn set(&self, key: &CodeKey, code: &str) -> Result<(), DomainError> {
        let storage_key = key.to_string();
        let mut table = self.table.lock().await;
        let now = Instant::now();

        if let Some(slot) = table.slots.get(&storage_key) {
            if !slot.code.is_expired(now) && slot.code.in_cooldown(now, self.policy.cooldown) {
                return Err(CodeError::SendTooFrequent.into());
            }
        }

        if !table.slots.contains_key(&storage_key) {
            table.make_room(self.max_entries, now);
        }
        let last_used = table.tick();
        table.slots.insert(
            storage_key,
            Slot {
                code: VerificationCode::issue(code, now, &self.policy),
                last_used,
            },
        );
        Ok(())
    }

    async fn verify(&self, key: &CodeKey, input_code: &str) -> Result<bool, DomainError> {
        let storage_key = key.to_string();
        let mut table = self.table.lock().await;
        let now = Instant::now();
        let last_used = table.tick();

        if let Some(slot) = table.slots.get_mut(&storage_key) {
            if !slot.code.is_expired(now) {
                slot.last_used = last_used;
                return slot.code.check(input_code).map_err(DomainError::from);
            }
        }

        // Missing or expired
        table.slots.remove(&storage_key);
        Err(CodeError::NotFound.into())
    }
}

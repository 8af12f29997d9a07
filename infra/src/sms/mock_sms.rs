//! Mock SMS Service Implementation
//!
//! Logs messages instead of sending them and keeps a copy of the most recent
//! ones so that tests (and developers) can read the code that was "sent".

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use wb_core::{DomainError, SmsSender};
use wb_shared::phone::mask_phone_number;

/// Messages kept for inspection; older ones are dropped
pub const HISTORY_LIMIT: usize = 256;

/// One message accepted by the mock gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: String,
    pub template_id: String,
    pub args: Vec<String>,
    pub recipient: String,
}

/// Mock SMS service for development and testing
#[derive(Clone, Default)]
pub struct MockSmsService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures
    simulate_failure: Arc<AtomicBool>,
    sent: Arc<Mutex<VecDeque<SentMessage>>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages sent, including ones no longer kept
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// First template argument of the latest message to `recipient`
    pub async fn last_code_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.recipient == recipient)
            .and_then(|m| m.args.first().cloned())
    }

    /// Retained messages, oldest first
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.iter().cloned().collect()
    }
}

#[async_trait]
impl SmsSender for MockSmsService {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), DomainError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(DomainError::Sms {
                message: "Simulated SMS gateway failure".to_string(),
            });
        }

        let mut sent = self.sent.lock().await;
        for recipient in recipients {
            let message_id = format!("mock-{}", Uuid::new_v4());
            info!(
                phone = %mask_phone_number(recipient),
                template_id = template_id,
                message_id = %message_id,
                "[MOCK SMS] Message accepted"
            );
            if sent.len() == HISTORY_LIMIT {
                sent.pop_front();
            }
            sent.push_back(SentMessage {
                message_id,
                template_id: template_id.to_string(),
                args: args.to_vec(),
                recipient: recipient.clone(),
            });
            self.message_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_each_recipient() {
        let sms = MockSmsService::new();
        sms.send(
            "1877556",
            &["123456".to_string()],
            &["13588888888".to_string(), "13500000000".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(sms.get_message_count(), 2);
        assert_eq!(sms.last_code_for("13588888888").await.as_deref(), Some("123456"));
        assert_eq!(sms.sent_messages().await[1].template_id, "1877556");
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let sms = MockSmsService::new();
        let total = HISTORY_LIMIT * 4;
        for i in 0..total {
            let code = format!("{:06}", i);
            sms.send("1877556", &[code], &[format!("135{:08}", i)])
                .await
                .unwrap();
        }

        let kept = sms.sent_messages().await;
        assert_eq!(kept.len(), HISTORY_LIMIT);
        assert_eq!(sms.get_message_count(), total as u64);
        assert_eq!(kept[0].recipient, format!("135{:08}", total - HISTORY_LIMIT));

        let latest = format!("135{:08}", total - 1);
        assert_eq!(
            sms.last_code_for(&latest).await,
            Some(format!("{:06}", total - 1))
        );
        assert!(sms.last_code_for("13500000000").await.is_none());
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let sms = MockSmsService::new();
        sms.set_simulate_failure(true);

        let result = sms
            .send("1877556", &["123456".to_string()], &["13588888888".to_string()])
            .await;
        assert!(matches!(result, Err(DomainError::Sms { .. })));
        assert_eq!(sms.get_message_count(), 0);
        assert!(sms.last_code_for("13588888888").await.is_none());
    }
}

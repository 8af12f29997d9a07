//! Mock implementations for testing the code service

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::DomainError;
use crate::services::verification::SmsSender;

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    pub template_id: String,
    pub args: Vec<String>,
    pub recipients: Vec<String>,
}

// Mock SMS gateway recording every dispatch
#[derive(Clone, Default)]
pub struct RecordingSmsSender {
    pub sent: Arc<Mutex<Vec<SentSms>>>,
    pub should_fail: Arc<AtomicBool>,
}

impl RecordingSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let sender = Self::default();
        sender.should_fail.store(true, Ordering::SeqCst);
        sender
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Code carried by the latest message to `phone`
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.recipients.iter().any(|r| r == phone))
            .and_then(|m| m.args.first().cloned())
    }
}

#[async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::Sms {
                message: "SMS service error".to_string(),
            });
        }
        self.sent.lock().unwrap().push(SentSms {
            template_id: template_id.to_string(),
            args: args.to_vec(),
            recipients: recipients.to_vec(),
        });
        Ok(())
    }
}

/// In-memory sink for formatted log lines
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's events into the buffer until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

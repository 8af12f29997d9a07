//! Messaging gateway seam

use async_trait::async_trait;

use crate::errors::DomainError;

/// Outbound messaging gateway.
///
/// Opaque beyond this call: render template `template_id` with `args` and
/// deliver it to every recipient.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(
        &self,
        template_id: &str,
        args: &[String],
        recipients: &[String],
    ) -> Result<(), DomainError>;
}

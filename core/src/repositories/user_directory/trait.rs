//! Lookup of the subject id behind a phone number.

use async_trait::async_trait;

use crate::errors::DomainError;

/// Resolves the account a verified phone number belongs to.
///
/// User persistence lives outside this service; this trait is the seam the
/// SMS login flow uses to turn a phone number into a token subject.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Id of the account registered with `phone`, creating one if needed
    async fn find_or_create_by_phone(&self, phone: &str) -> Result<String, DomainError>;
}

//! Main code service implementation

use std::sync::Arc;

use wb_shared::phone::{canonical_phone, mask_phone_number};

use crate::domain::entities::verification_code::{generate_code, is_well_formed, CODE_LENGTH};
use crate::domain::value_objects::CodeKey;
use crate::errors::{CodeError, DomainError, DomainResult};
use crate::repositories::CodeStore;

use super::config::CodeServiceConfig;
use super::traits::SmsSender;

/// Issues and checks one-time codes.
///
/// The service never retries: store and gateway faults go straight back to
/// the caller.
pub struct CodeService {
    /// Where codes live
    store: Arc<dyn CodeStore>,
    /// Gateway used to deliver codes
    sms: Arc<dyn SmsSender>,
    /// Service configuration
    config: CodeServiceConfig,
}

impl CodeService {
    /// Create a new code service
    pub fn new(
        store: Arc<dyn CodeStore>,
        sms: Arc<dyn SmsSender>,
        config: CodeServiceConfig,
    ) -> Self {
        Self { store, sms, config }
    }

    /// Send a fresh code for `biz` to `phone`
    ///
    /// This method:
    /// 1. Validates the scenario and phone number
    /// 2. Generates a random 6-digit code
    /// 3. Stores it, subject to the resend cooldown
    /// 4. Dispatches it through the SMS gateway
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - bad scenario or phone; nothing stored
    /// * `CodeError::SendTooFrequent` - a code was issued less than a cooldown
    ///   ago; nothing sent
    /// * `StoreError` - the store failed; nothing sent
    /// * `DomainError::Sms` / `RateLimitError` - dispatch failed after the code
    ///   was stored; it stays valid until it expires
    pub async fn send(&self, biz: &str, phone: &str) -> DomainResult<()> {
        let key = Self::key(biz, phone)?;
        let masked = mask_phone_number(key.phone());
        let code = generate_code();

        if let Err(e) = self.store.set(&key, &code).await {
            if let DomainError::Code(CodeError::SendTooFrequent) = e {
                tracing::info!(
                    phone = %masked,
                    biz = biz,
                    event = "otp_send_too_frequent",
                    "Verification code requested within cooldown"
                );
            } else {
                tracing::error!(
                    phone = %masked,
                    biz = biz,
                    error = %e,
                    event = "otp_storage_failed",
                    "Failed to store verification code"
                );
            }
            return Err(e);
        }

        tracing::info!(
            phone = %masked,
            biz = biz,
            event = "otp_generated",
            "Stored new verification code"
        );

        self.sms
            .send(
                &self.config.template_id,
                &[code],
                &[key.phone().to_string()],
            )
            .await
            .map_err(|e| {
                if e.is_expected() {
                    tracing::info!(
                        phone = %masked,
                        biz = biz,
                        reason = %e,
                        event = "otp_dispatch_throttled",
                        "Verification code held back by the outbound limit"
                    );
                } else {
                    tracing::error!(
                        phone = %masked,
                        biz = biz,
                        error = %e,
                        event = "otp_dispatch_failed",
                        "Failed to dispatch verification code"
                    );
                }
                e
            })
    }

    /// Check `input_code` against the live code for `biz` and `phone`
    ///
    /// Returns `Ok(true)` on a match and `Ok(false)` on a miss.
    ///
    /// # Errors
    ///
    /// * `DomainError::Validation` - malformed phone; nothing consumed
    /// * `CodeError::InvalidFormat` - not six digits; nothing consumed
    /// * `CodeError::TooManyAttempts` - attempts exhausted or code already used
    /// * `CodeError::NotFound` - no live code
    /// * `StoreError` - the store failed
    pub async fn verify(&self, biz: &str, phone: &str, input_code: &str) -> DomainResult<bool> {
        let key = Self::key(biz, phone)?;
        if !is_well_formed(input_code) {
            return Err(CodeError::InvalidFormat {
                expected: CODE_LENGTH,
            }
            .into());
        }

        let masked = mask_phone_number(key.phone());
        match self.store.verify(&key, input_code).await {
            Ok(true) => {
                tracing::info!(
                    phone = %masked,
                    biz = biz,
                    event = "otp_verified",
                    "Verification code matched"
                );
                Ok(true)
            }
            Ok(false) => {
                tracing::info!(
                    phone = %masked,
                    biz = biz,
                    event = "otp_mismatch",
                    "Verification code did not match"
                );
                Ok(false)
            }
            Err(e) if e.is_expected() => {
                tracing::info!(
                    phone = %masked,
                    biz = biz,
                    reason = %e,
                    event = "otp_rejected",
                    "Verification code rejected"
                );
                Err(e)
            }
            Err(e) => {
                tracing::error!(
                    phone = %masked,
                    biz = biz,
                    error = %e,
                    event = "otp_verify_failed",
                    "Verification code check failed"
                );
                Err(e)
            }
        }
    }

    fn key(biz: &str, phone: &str) -> DomainResult<CodeKey> {
        if biz.is_empty() || !biz.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return Err(DomainError::Validation {
                message: format!("Invalid scenario: {}", biz),
            });
        }
        let phone = canonical_phone(phone).ok_or_else(|| DomainError::Validation {
            message: "Invalid phone number format".to_string(),
        })?;
        Ok(CodeKey::new(biz, phone))
    }
}

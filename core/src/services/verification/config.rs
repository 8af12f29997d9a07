//! Configuration for the code service

use wb_shared::config::VerificationConfig;

/// Configuration for the code service
///
/// Lifetime, cooldown and attempt budget are enforced by the code store and
/// configured there.
#[derive(Debug, Clone)]
pub struct CodeServiceConfig {
    /// Template id of the verification SMS
    pub template_id: String,
}

impl Default for CodeServiceConfig {
    fn default() -> Self {
        Self::from(&VerificationConfig::default())
    }
}

impl From<&VerificationConfig> for CodeServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            template_id: config.sms_template_id.clone(),
        }
    }
}

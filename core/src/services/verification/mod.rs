//! Verification code service for SMS login
//!
//! This module provides the send/verify workflow:
//! - code generation and dispatch through an [`SmsSender`]
//! - cooldown and attempt accounting, delegated to a [`CodeStore`]
//!
//! [`CodeStore`]: crate::repositories::CodeStore

mod config;
mod service;
mod traits;

#[cfg(test)]
pub(crate) mod tests;

pub use config::CodeServiceConfig;
pub use service::CodeService;
pub use traits::SmsSender;

//! Token service module for JWT sessions
//!
//! This module handles all token-related operations:
//! - issuing an access/refresh pair bound to a new server-side session
//! - validating access tokens (signature, time window, device, liveness)
//!   with silent renewal near expiry
//! - refresh with rotation, so a refresh token works at most once
//! - session revocation

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;

//! # Webook Core
//!
//! Domain layer for the Webook auth backend.
//! This crate contains the domain entities, the storage/gateway traits the
//! infrastructure layer implements, the code and token services, and the
//! error taxonomy shared by every layer above it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

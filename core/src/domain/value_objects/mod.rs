//! Value objects representing immutable domain concepts.

pub mod code_key;

// Re-export commonly used types
pub use code_key::{CodeKey, LOGIN_BIZ};

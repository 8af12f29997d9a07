//! Shared response helpers for route handlers

pub mod error;

pub use error::{domain_error_response, invalid_input, json_error_handler};

//! Type definitions shared by the HTTP layer
//!
//! - `response` - the `{code, msg, data}` envelope and health check payload

pub mod response;

pub use response::{ApiResponse, ErrorBody, HealthResponse};

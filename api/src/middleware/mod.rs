//! Middleware components for the API layer
//!
//! - `auth` - JWT validation, device binding and near-expiry renewal
//! - `rate_limit` - per-IP sliding-window limiting

pub mod auth;
pub mod rate_limit;

pub use auth::{
    AuthContext, JwtAuth, ACCESS_TOKEN_HEADER, EXPOSED_TOKEN_HEADERS, REFRESH_TOKEN_HEADER,
};
pub use rate_limit::RateLimit;

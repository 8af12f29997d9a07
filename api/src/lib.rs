//! HTTP surface of the Webook auth backend.
//!
//! Library exports for the binary and the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};

//! Route handlers
//!
//! - `users` - SMS login, token refresh, logout and the profile probe
//! - `health` - liveness of the process and its shared store

pub mod health;
pub mod users;

use actix_web::web;

/// Register every route on `cfg`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .configure(users::configure);
}

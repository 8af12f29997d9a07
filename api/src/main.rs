use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use wb_api::{create_app, telemetry::init_tracing, AppState};
use wb_infra::{sms::MockSmsService, users::MemoryUserDirectory};
use wb_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!(
        environment = ?config.environment,
        bind_address = %config.server.bind_address(),
        "Starting Webook auth server"
    );
    if config.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is not set; signing with the development secret");
    }

    let infra = wb_infra::initialize(&config)
        .await
        .context("Failed to initialize infrastructure")?;

    // Vendor gateways are not wired; the mock logs and records each message
    let sms = Arc::new(MockSmsService::new());
    let users = Arc::new(MemoryUserDirectory::new());

    let state = AppState::new(&config, infra, sms, users)
        .context("Failed to build application state")?;
    let state = web::Data::new(state);

    let mut server = HttpServer::new(move || create_app(state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("Failed to bind {}", config.server.bind_address()))?
        .run()
        .await
        .context("HTTP server terminated with an error")?;

    tracing::info!("Server stopped");
    Ok(())
}

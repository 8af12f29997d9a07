use actix_web::{web, HttpResponse};
use chrono::Utc;
use wb_shared::HealthResponse;

use crate::app::AppState;

/// Handler for GET /health
///
/// Always 200; `status` is "degraded" when Redis backs the services but does
/// not answer a PING. In-memory wiring has nothing to probe.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let redis = match &state.redis {
        Some(client) => client.health_check().await.unwrap_or(false),
        None => true,
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if redis { "healthy" } else { "degraded" }.to_string(),
        redis,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

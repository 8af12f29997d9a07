use actix_web::{web, HttpRequest, HttpResponse};
use wb_shared::messages;

use super::token_response;
use crate::app::AppState;
use crate::handlers::domain_error_response;
use crate::middleware::auth::{device_fingerprint, extract_bearer_token};

/// Handler for POST /users/refresh_token
///
/// Expects the refresh token as `Authorization: Bearer <token>`. The path is
/// on the authentication allow-list, so the access token checks do not run
/// here. A refresh token is good for exactly one successful call: its session
/// is revoked and a new one is started. Every failure is an empty 401.
pub async fn refresh_token(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let Some(token) = extract_bearer_token(req.headers()) else {
        return HttpResponse::Unauthorized().finish();
    };

    match state
        .tokens
        .refresh(&token, &device_fingerprint(req.headers()))
        .await
    {
        Ok(pair) => token_response(messages::REFRESH_OK, pair),
        Err(e) if e.is_system_error() => {
            tracing::error!(error = %e, "Token refresh failed");
            HttpResponse::Unauthorized().finish()
        }
        Err(e) => domain_error_response(&e),
    }
}

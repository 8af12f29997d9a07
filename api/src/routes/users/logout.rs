use actix_web::{web, HttpResponse};
use wb_shared::{messages, ApiResponse};

use crate::app::AppState;
use crate::handlers::domain_error_response;
use crate::middleware::AuthContext;

/// Handler for POST /users/logout
///
/// Revokes the caller's session; every token bound to it stops working.
pub async fn logout(auth: AuthContext, state: web::Data<AppState>) -> HttpResponse {
    match state.tokens.revoke(&auth.session_id).await {
        Ok(()) => {
            tracing::info!(
                user_id = %auth.user_id,
                session_id = %auth.session_id,
                event = "logout",
                "Session revoked"
            );
            HttpResponse::Ok().json(ApiResponse::<()>::ok(messages::LOGOUT_OK))
        }
        Err(e) => domain_error_response(&e),
    }
}

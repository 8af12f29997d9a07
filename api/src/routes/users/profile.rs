use actix_web::HttpResponse;
use wb_shared::ApiResponse;

use crate::dto::ProfileData;
use crate::middleware::AuthContext;

/// Handler for GET /users/profile
pub async fn profile(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(
        "ok",
        ProfileData {
            user_id: auth.user_id,
        },
    ))
}

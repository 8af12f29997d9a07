use actix_web::{web, HttpResponse};
use validator::Validate;
use wb_core::LOGIN_BIZ;
use wb_shared::{messages, ApiResponse};

use crate::app::AppState;
use crate::dto::SendCodeRequest;
use crate::handlers::{domain_error_response, invalid_input};

/// Handler for POST /users/login_sms/code/send
///
/// Issues a login code for `phone` and dispatches it by SMS.
///
/// # Request Body
///
/// ```json
/// { "phone": "13588888888" }
/// ```
///
/// # Responses
///
/// All 200 with the envelope: `code` 0 when sent, 4 for a malformed phone or
/// a resend inside the cooldown, 5 when the store or gateway failed.
pub async fn send_code(
    state: web::Data<AppState>,
    request: web::Json<SendCodeRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if request.validate().is_err() {
        return invalid_input();
    }

    match state.codes.send(LOGIN_BIZ, &request.phone).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()>::ok(messages::SEND_OK)),
        Err(e) => domain_error_response(&e),
    }
}

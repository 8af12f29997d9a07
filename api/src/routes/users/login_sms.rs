use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;
use wb_core::LOGIN_BIZ;
use wb_shared::phone::{canonical_phone, mask_phone_number};
use wb_shared::{messages, ApiResponse};

use super::token_response;
use crate::app::AppState;
use crate::dto::LoginSmsRequest;
use crate::handlers::{domain_error_response, invalid_input};
use crate::middleware::auth::device_fingerprint;

/// Handler for POST /users/login_sms
///
/// Checks the login code, resolves the account behind the phone number
/// (creating one on first login) and starts a session bound to the caller's
/// `User-Agent`. Tokens come back in the `x-jwt-token` and `x-refresh-token`
/// headers.
pub async fn login_sms(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginSmsRequest>,
) -> HttpResponse {
    let request = request.into_inner();
    if request.validate().is_err() {
        return invalid_input();
    }

    match state.codes.verify(LOGIN_BIZ, &request.phone, &request.code).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Ok().json(ApiResponse::<()>::user_error(messages::WRONG_CODE))
        }
        Err(e) => return domain_error_response(&e),
    }

    // verify has already rejected anything that does not normalize
    let Some(phone) = canonical_phone(&request.phone) else {
        return invalid_input();
    };

    let user_id = match state.users.find_or_create_by_phone(&phone).await {
        Ok(id) => id,
        Err(e) => return domain_error_response(&e),
    };

    match state
        .tokens
        .issue_tokens(&user_id, &device_fingerprint(req.headers()))
        .await
    {
        Ok(pair) => {
            tracing::info!(
                phone = %mask_phone_number(&phone),
                user_id = %user_id,
                session_id = %pair.session_id,
                event = "login_sms_succeeded",
                "User logged in by SMS code"
            );
            token_response(messages::LOGIN_OK, pair)
        }
        Err(e) => domain_error_response(&e),
    }
}

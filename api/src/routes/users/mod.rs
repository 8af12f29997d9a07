//! `/users` endpoints

pub mod login_sms;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod send_code;

use actix_web::{
    http::header::{HeaderName, ACCESS_CONTROL_EXPOSE_HEADERS},
    web, HttpResponse,
};
use wb_core::TokenPair;
use wb_shared::ApiResponse;

use crate::dto::TokenData;
use crate::middleware::auth::{ACCESS_TOKEN_HEADER, EXPOSED_TOKEN_HEADERS, REFRESH_TOKEN_HEADER};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/login_sms/code/send", web::post().to(send_code::send_code))
            .route("/login_sms", web::post().to(login_sms::login_sms))
            .route("/refresh_token", web::post().to(refresh::refresh_token))
            .route("/logout", web::post().to(logout::logout))
            .route("/profile", web::get().to(profile::profile)),
    );
}

/// Envelope response carrying a fresh token pair in the response headers
pub(crate) fn token_response(message: &str, pair: TokenPair) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((HeaderName::from_static(ACCESS_TOKEN_HEADER), pair.access_token))
        .insert_header((HeaderName::from_static(REFRESH_TOKEN_HEADER), pair.refresh_token))
        .insert_header((ACCESS_CONTROL_EXPOSE_HEADERS, EXPOSED_TOKEN_HEADERS))
        .json(ApiResponse::success(
            message,
            TokenData {
                expires_in: pair.access_expires_in,
                refresh_expires_in: pair.refresh_expires_in,
            },
        ))
}

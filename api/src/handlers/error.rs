//! Mapping from domain errors to HTTP responses
//!
//! Business outcomes travel in the `{code, msg, data}` envelope with HTTP
//! 200; only authentication failures (401) and inbound rate limiting (429)
//! use the status line.

use actix_web::{error::InternalError, error::JsonPayloadError, HttpRequest, HttpResponse};
use wb_core::{CodeError, DomainError};
use wb_shared::{messages, ApiResponse};

/// Response for a failed domain operation
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { .. } | DomainError::Code(CodeError::InvalidFormat { .. }) => {
            invalid_input()
        }
        DomainError::Code(CodeError::SendTooFrequent) => {
            user_error(messages::SEND_TOO_FREQUENT)
        }
        DomainError::Code(CodeError::TooManyAttempts) => user_error(messages::TOO_MANY_ATTEMPTS),
        // No live code reads the same as a wrong one to the caller
        DomainError::Code(CodeError::NotFound) => user_error(messages::WRONG_CODE),
        DomainError::Token(reason) => {
            tracing::debug!(reason = %reason, "Rejected credentials");
            HttpResponse::Unauthorized().finish()
        }
        // Outbound limit: reported as a system error, but it is not a fault
        DomainError::RateLimit(reason) => {
            tracing::info!(reason = %reason, "Request held back by an outbound rate limit");
            HttpResponse::Ok().json(ApiResponse::<()>::system_error())
        }
        DomainError::Store(_)
        | DomainError::Sms { .. }
        | DomainError::Internal { .. } => {
            tracing::error!(error = %error, "Request failed with a system error");
            HttpResponse::Ok().json(ApiResponse::<()>::system_error())
        }
    }
}

pub fn invalid_input() -> HttpResponse {
    user_error(messages::INVALID_INPUT)
}

fn user_error(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<()>::user_error(message))
}

/// Answer malformed JSON bodies with the envelope instead of a bare 400
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    InternalError::from_response(err, invalid_input()).into()
}

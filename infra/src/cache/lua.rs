//! Server-side scripts and the meaning of their integer replies.

use once_cell::sync::Lazy;
use redis::Script;
use wb_core::{CodeError, DomainError, StoreError};

pub(crate) static SET_CODE: Lazy<Script> =
    Lazy::new(|| Script::new(include_str!("scripts/set_code.lua")));

pub(crate) static VERIFY_CODE: Lazy<Script> =
    Lazy::new(|| Script::new(include_str!("scripts/verify_code.lua")));

pub(crate) static SLIDE_WINDOW: Lazy<Script> =
    Lazy::new(|| Script::new(include_str!("scripts/slide_window.lua")));

pub(crate) fn set_code_outcome(reply: i64) -> Result<(), DomainError> {
    match reply {
        0 => Ok(()),
        -1 => Err(CodeError::SendTooFrequent.into()),
        -2 => Err(StoreError::Backend {
            message: "verification code key has no expiry".to_string(),
        }
        .into()),
        other => Err(StoreError::UnexpectedReply {
            operation: "set_code",
            reply: other,
        }
        .into()),
    }
}

pub(crate) fn verify_code_outcome(reply: i64) -> Result<bool, DomainError> {
    match reply {
        0 => Ok(true),
        -2 => Ok(false),
        -1 => Err(CodeError::TooManyAttempts.into()),
        -3 => Err(CodeError::NotFound.into()),
        -4 => Err(StoreError::Backend {
            message: "verification code entry is malformed".to_string(),
        }
        .into()),
        other => Err(StoreError::UnexpectedReply {
            operation: "verify_code",
            reply: other,
        }
        .into()),
    }
}

/// `true` when the event was admitted
pub(crate) fn slide_window_outcome(reply: i64) -> Result<bool, DomainError> {
    match reply {
        0 => Ok(true),
        1 => Ok(false),
        other => Err(StoreError::UnexpectedReply {
            operation: "slide_window",
            reply: other,
        }
        .into()),
    }
}

//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{messages, result_codes};

/// Standard API response envelope: `{code, msg, data}`
///
/// `code` is one of [`result_codes`]; HTTP status stays 200 for every
/// envelope response, only authentication and inbound throttling use
/// dedicated statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub code: i32,

    pub msg: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response carrying data
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: result_codes::SUCCESS,
            msg: msg.into(),
            data: Some(data),
        }
    }

    /// Successful response without payload
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            code: result_codes::SUCCESS,
            msg: msg.into(),
            data: None,
        }
    }

    /// Caller-side failure (bad input, wrong code, throttled)
    pub fn user_error(msg: impl Into<String>) -> Self {
        Self {
            code: result_codes::USER_ERROR,
            msg: msg.into(),
            data: None,
        }
    }

    /// Backing store or gateway failure; the message never leaks details
    pub fn system_error() -> Self {
        Self {
            code: result_codes::SYSTEM_ERROR,
            msg: messages::SYSTEM_ERROR.to_string(),
            data: None,
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.code == result_codes::SUCCESS
    }
}

/// Body used for 401/429 responses produced by middleware
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// One of `error_codes`
    pub error: String,

    pub message: String,

    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Whether the shared store answered a PING
    pub redis: bool,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

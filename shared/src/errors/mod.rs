//! Shared error codes and user-facing messages

/// Numeric `code` values of the response envelope
pub mod result_codes {
    /// Request handled successfully
    pub const SUCCESS: i32 = 0;
    /// The caller did something wrong or must wait (bad input, wrong code,
    /// too frequent, too many attempts)
    pub const USER_ERROR: i32 = 4;
    /// A backing store or gateway failed
    pub const SYSTEM_ERROR: i32 = 5;
}

/// Stable machine-readable error identifiers, logged and returned on
/// non-envelope responses (401, 429)
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const SEND_TOO_FREQUENT: &str = "SEND_TOO_FREQUENT";
    pub const WRONG_CODE: &str = "WRONG_CODE";
    pub const TOO_MANY_ATTEMPTS: &str = "TOO_MANY_ATTEMPTS";
    pub const SYSTEM_ERROR: &str = "SYSTEM_ERROR";
}

/// Messages carried in the envelope's `msg` field
pub mod messages {
    pub const SEND_OK: &str = "code sent";
    pub const LOGIN_OK: &str = "login succeeded";
    pub const REFRESH_OK: &str = "token refreshed";
    pub const LOGOUT_OK: &str = "logged out";
    pub const INVALID_INPUT: &str = "invalid input";
    pub const SEND_TOO_FREQUENT: &str = "sending too frequently, please try again later";
    pub const WRONG_CODE: &str = "wrong verification code";
    pub const TOO_MANY_ATTEMPTS: &str = "too many attempts, please request a new code";
    pub const SYSTEM_ERROR: &str = "system error";
}

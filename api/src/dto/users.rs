use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Mainland mobile or E.164 number; spaces, dashes and parentheses
    /// allowed. The length bound is loose: the number itself is checked
    /// after normalization.
    #[validate(length(min = 11, max = 20))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginSmsRequest {
    #[validate(length(min = 11, max = 20))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,
}

/// Lifetimes of the tokens returned in the response headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileData {
    pub user_id: String,
}

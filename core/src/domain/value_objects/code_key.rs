//! Address of a verification code: business scenario plus phone number.

use std::fmt;

/// Scenario used by SMS login
pub const LOGIN_BIZ: &str = "login";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeKey {
    biz: String,
    phone: String,
}

impl CodeKey {
    pub fn new(biz: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            biz: biz.into(),
            phone: phone.into(),
        }
    }

    pub fn biz(&self) -> &str {
        &self.biz
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }
}

/// Renders as the storage key, `phone_code:{biz}:{phone}`
impl fmt::Display for CodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phone_code:{}:{}", self.biz, self.phone)
    }
}

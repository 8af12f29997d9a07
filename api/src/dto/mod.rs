//! Request and response bodies

pub mod users;

pub use users::{LoginSmsRequest, ProfileData, SendCodeRequest, TokenData};

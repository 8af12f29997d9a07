//! SMS gateways
//!
//! Only the development gateway lives here; a vendor gateway is another
//! [`wb_core::SmsSender`] implementation wired in `main`.

pub mod mock_sms;

pub use mock_sms::{MockSmsService, SentMessage};

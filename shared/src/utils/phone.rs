//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Mainland mobile numbers: 11 digits starting with 13-19
static CHINA_MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("static regex"));

// E.164
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("static regex"));

/// Strip spaces, dashes and parentheses, keeping digits and a leading `+`
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid (either mainland mobile or E.164)
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    CHINA_MOBILE_REGEX.is_match(&normalized) || INTERNATIONAL_PHONE_REGEX.is_match(&normalized)
}

/// Normalized form of `phone`, or `None` if it is not a phone number.
///
/// Code store keys are built from this form so `138-1234-5678` and
/// `13812345678` address the same challenge.
pub fn canonical_phone(phone: &str) -> Option<String> {
    let normalized = normalize_phone_number(phone);
    if is_valid_phone(&normalized) {
        Some(normalized)
    } else {
        None
    }
}

/// Mask a phone number for logs (e.g., 138****5678)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

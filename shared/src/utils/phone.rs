//! Phone number utilities
//!
//! Normalization and validation helpers shared by the verification service
//! and the SMS gateway clients. Normalization targets E.164; numbers entered
//! in Turkish local format (leading `0` or bare `90`) are resolved to `+90`.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164-shaped phone number: `+` followed by 2-15 digits
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+\d{2,15}$").unwrap());

/// Normalize a phone number to E.164 form.
///
/// Formatting characters (spaces, dashes, parentheses) are stripped first,
/// then:
/// - a leading `0` is replaced with `+90` (Turkish local format)
/// - a leading `90` gets a `+` prefix
/// - any other bare digit string gets a `+` prefix
/// - an already `+`-prefixed number is returned unchanged
///
/// The operation is idempotent: normalizing an already-normalized number
/// yields the same value.
pub fn normalize_phone_number(phone: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    if cleaned.starts_with('+') {
        cleaned
    } else if let Some(rest) = cleaned.strip_prefix('0') {
        format!("+90{}", rest)
    } else if cleaned.starts_with("90") {
        format!("+{}", cleaned)
    } else {
        format!("+{}", cleaned)
    }
}

/// Check if a phone number is in valid E.164 shape (`+` plus 2-15 digits)
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Convert an E.164 number to the local-digit format expected by the
/// Turkish SMS gateways: the `+90` country code is stripped entirely,
/// any other `+` prefix is dropped.
pub fn to_local_format(phone: &str) -> String {
    if let Some(local) = phone.strip_prefix("+90") {
        local.to_string()
    } else {
        phone.trim_start_matches('+').to_string()
    }
}

/// Mask a phone number for logging, keeping only the last four characters.
///
/// Works on characters rather than bytes: this is also called on raw,
/// unvalidated input from the invalid-number error paths, which may contain
/// multibyte characters.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let visible = 4;
    let last_digits: String = chars[chars.len() - visible..].iter().collect();

    if chars[0] == '+' {
        format!("+{}{}", "*".repeat(chars.len() - 1 - visible), last_digits)
    } else {
        format!("{}{}", "*".repeat(chars.len() - visible), last_digits)
    }
}

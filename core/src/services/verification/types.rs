//! Outcome types returned by the verification service
//!
//! Public service methods never propagate errors; callers always receive one
//! of these discriminated results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a send-code request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeOutcome {
    /// Whether a code was issued and handed to the SMS provider
    pub success: bool,
    /// User-facing message
    pub message: String,
    /// Seconds until a resend is allowed, when throttled or advised by the
    /// provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_seconds: Option<i64>,
    /// When the issued code expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SendCodeOutcome {
    pub(crate) fn sent(expires_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            message: "Verification code sent".to_string(),
            cooldown_seconds: None,
            expires_at: Some(expires_at),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            cooldown_seconds: None,
            expires_at: None,
        }
    }

    pub(crate) fn throttled(message: impl Into<String>, cooldown_seconds: i64) -> Self {
        Self {
            success: false,
            message: message.into(),
            cooldown_seconds: Some(cooldown_seconds),
            expires_at: None,
        }
    }
}

/// Result of a verify-code request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCodeOutcome {
    /// Whether the submitted code was accepted
    pub success: bool,
    /// Whether the phone is now verified
    pub verified: bool,
    /// User-facing message
    pub message: String,
    /// Attempts left on the current code after this call, on mismatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_attempts: Option<i32>,
}

impl VerifyCodeOutcome {
    pub(crate) fn verified() -> Self {
        Self {
            success: true,
            verified: true,
            message: "Phone number verified".to_string(),
            remaining_attempts: None,
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            verified: false,
            message: message.into(),
            remaining_attempts: None,
        }
    }

    pub(crate) fn wrong_code(remaining: i32) -> Self {
        Self {
            success: false,
            verified: false,
            message: format!("Invalid verification code. {} attempts remaining", remaining),
            remaining_attempts: Some(remaining),
        }
    }
}

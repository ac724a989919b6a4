//! Verification service configuration

/// Configuration for the phone verification service
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Minutes until an issued code expires
    pub code_expiration_minutes: i64,
    /// Maximum verification attempts per code
    pub max_attempts: i32,
    /// Seconds a user must wait between send-code requests
    pub resend_cooldown_seconds: i64,
    /// Whether the resend cooldown is enforced (deployment flag)
    pub rate_limiting_enabled: bool,
}

impl VerificationConfig {
    /// Load configuration from environment variables
    ///
    /// Only the rate-limiting switch (`SMS_RATE_LIMITING_ENABLED`) is
    /// environment-driven; the timing constants are fixed policy.
    pub fn from_env() -> Self {
        let rate_limiting_enabled = std::env::var("SMS_RATE_LIMITING_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(true);

        Self {
            rate_limiting_enabled,
            ..Self::default()
        }
    }

    /// Disable rate limiting (useful in tests)
    pub fn without_rate_limiting(mut self) -> Self {
        self.rate_limiting_enabled = false;
        self
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: 10,
            max_attempts: 3,
            resend_cooldown_seconds: 60,
            rate_limiting_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.code_expiration_minutes, 10);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.resend_cooldown_seconds, 60);
        assert!(config.rate_limiting_enabled);
    }

    #[test]
    fn test_without_rate_limiting() {
        let config = VerificationConfig::default().without_rate_limiting();
        assert!(!config.rate_limiting_enabled);
    }
}

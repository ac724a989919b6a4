//! CSRF engine configuration

use chrono::Duration;
use nk_shared::Environment;

use crate::errors::DomainError;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Request header carrying the candidate token
pub const DEFAULT_HEADER_NAME: &str = "x-csrf-token";

/// Cookie carrying the candidate token
pub const DEFAULT_COOKIE_NAME: &str = "csrf-token";

/// Configuration for the CSRF protection engine
#[derive(Debug, Clone)]
pub struct CsrfConfig {
    /// Server secret for double-submit signatures
    pub secret: String,
    /// How long an issued token stays valid
    pub token_lifetime: Duration,
    /// Header the engine reads candidate tokens from
    pub header_name: String,
    /// Cookie the engine reads candidate tokens from
    pub cookie_name: String,
    /// HTTP methods that never require a token
    pub safe_methods: Vec<String>,
    /// Whether issued cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl CsrfConfig {
    /// Create a configuration with defaults around the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            safe_methods: vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()],
            secure_cookies: Environment::from_env().is_production(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Requires `CSRF_SECRET`; the `Secure` cookie attribute follows the
    /// runtime environment flag.
    pub fn from_env() -> Result<Self, DomainError> {
        let secret = std::env::var("CSRF_SECRET").map_err(|_| DomainError::Configuration {
            message: "CSRF_SECRET not set".to_string(),
        })?;
        if secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "CSRF_SECRET must not be empty".to_string(),
            });
        }
        Ok(Self::new(secret))
    }

    /// Override the safe-method set
    pub fn with_safe_methods(mut self, methods: Vec<String>) -> Self {
        self.safe_methods = methods;
        self
    }

    /// Override the cookie `Secure` attribute (useful in tests)
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Whether the given HTTP method is in the safe set
    pub fn is_safe_method(&self, method: &str) -> bool {
        self.safe_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsrfConfig::new("secret").with_secure_cookies(false);
        assert_eq!(config.token_lifetime, Duration::seconds(3600));
        assert_eq!(config.header_name, "x-csrf-token");
        assert_eq!(config.cookie_name, "csrf-token");
        assert!(config.is_safe_method("GET"));
        assert!(config.is_safe_method("head"));
        assert!(config.is_safe_method("OPTIONS"));
        assert!(!config.is_safe_method("POST"));
    }

    #[test]
    fn test_custom_safe_methods() {
        let config =
            CsrfConfig::new("secret").with_safe_methods(vec!["GET".to_string()]);
        assert!(config.is_safe_method("GET"));
        assert!(!config.is_safe_method("HEAD"));
    }
}

//! Domain-specific error type definitions
//!
//! Errors at this layer never cross a public service boundary: the CSRF
//! engine and the verification service catch them internally and degrade to
//! typed outcome values. They exist so repository and provider
//! implementations have a uniform error channel to report through.

use thiserror::Error;

/// Domain-level errors for validation, persistence and internal failures
#[derive(Error, Debug)]
pub enum DomainError {
    /// Input failed validation
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Service or engine is misconfigured
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Internal error (storage, serialization, unexpected state)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors produced by SMS provider implementations
///
/// `Configuration` is fatal at construction time so that a misconfigured
/// gateway surfaces at boot rather than on the first user request.
/// `Delivery` is returned per send attempt and may carry a provider-suggested
/// retry delay; nothing at this layer retries automatically.
#[derive(Error, Debug)]
pub enum SmsError {
    /// Missing or invalid provider credentials
    #[error("SMS provider configuration error: {0}")]
    Configuration(String),

    /// The gateway rejected or failed to deliver the message
    #[error("SMS delivery failed: {message}")]
    Delivery {
        message: String,
        /// Seconds the caller should wait before retrying, if the gateway said so
        retry_after_seconds: Option<u64>,
    },
}

impl SmsError {
    /// Convenience constructor for a delivery failure without retry advice
    pub fn delivery(message: impl Into<String>) -> Self {
        SmsError::Delivery {
            message: message.into(),
            retry_after_seconds: None,
        }
    }
}

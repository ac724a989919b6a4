//! # NitroKit Infrastructure
//!
//! Concrete implementations behind the core security services:
//!
//! - **SMS**: gateway clients for AWS SNS, Twilio, İletim Merkezi, NetGSM
//!   and Mutlucell, plus a mock provider for development
//! - **Database**: MySQL repositories for verification records and user
//!   phone-verification fields (SQLx)
//!
//! ## Features
//!
//! - `mysql`: MySQL database support (default)
//! - `twilio-sms`: Twilio SMS gateway (default)
//! - `aws-sns`: AWS SNS SMS gateway (default)

pub mod config;
pub mod sms;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

pub use config::{SmsConfig, SmsProvider};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

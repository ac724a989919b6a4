//! Phone verification service
//!
//! OTP issuance and verification for proving phone number ownership:
//! code generation, resend cooldown, attempt caps, and the verified-state
//! transition on the user record. SMS delivery is delegated to an injected
//! [`SmsService`] implementation.

pub mod config;
pub mod service;
pub mod traits;
pub mod types;

pub use config::VerificationConfig;
pub use service::PhoneVerificationService;
pub use traits::SmsService;
pub use types::{SendCodeOutcome, VerifyCodeOutcome};

#[cfg(test)]
mod tests;

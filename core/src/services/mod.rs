//! Business services for the security layer

pub mod csrf;
pub mod verification;

pub use csrf::{CsrfConfig, CsrfEngine, CsrfProtection, InMemoryTokenStore, RequestContext};
pub use verification::{PhoneVerificationService, SmsService, VerificationConfig};

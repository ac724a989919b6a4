//! Repository interfaces for persisted verification state
//!
//! The traits here form the persistence seam between the domain services and
//! the infrastructure layer. Mock implementations live alongside each trait
//! for use in tests.

pub mod user;
pub mod verification;

pub use user::{MockUserRepository, UserRepository};
pub use verification::{MockPhoneVerificationRepository, PhoneVerificationRepository};

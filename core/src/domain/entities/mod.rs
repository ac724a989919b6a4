//! Domain entities

pub mod phone_verification;
pub mod user;

pub use phone_verification::{PhoneVerification, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES, MAX_ATTEMPTS};
pub use user::User;

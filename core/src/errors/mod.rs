//! Error types for the core security services

mod types;

pub use types::{DomainError, SmsError};

/// Result type alias using DomainError
pub type DomainResult<T> = Result<T, DomainError>;

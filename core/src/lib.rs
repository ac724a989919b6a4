//! # NitroKit Core
//!
//! Core security services for the NitroKit backend. This crate contains the
//! request-level trust boundary logic: CSRF token protection, phone number
//! verification, the SMS delivery seam, and the repository interfaces that
//! back them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

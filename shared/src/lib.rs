//! # NitroKit Shared
//!
//! Shared configuration and utility modules used by the core and
//! infrastructure layers: runtime environment detection and phone number
//! normalization/validation helpers.

pub mod config;
pub mod utils;

pub use config::environment::Environment;

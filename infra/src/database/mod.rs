//! Database module - MySQL implementations using SQLx
//!
//! Connection pool management plus the MySQL repositories backing the
//! phone verification domain.

pub mod connection;
pub mod mysql;

pub use connection::create_pool;
pub use mysql::{MySqlPhoneVerificationRepository, MySqlUserRepository};

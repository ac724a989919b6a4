//! Domain layer - entities for phone verification

pub mod entities;

pub use entities::*;

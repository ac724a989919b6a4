//! Configuration modules shared across the workspace

pub mod environment;

pub use environment::Environment;

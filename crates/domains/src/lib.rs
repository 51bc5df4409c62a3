//! picstash/crates/domains/src/lib.rs
//!
//! Domain models, error taxonomy, and the port traits every adapter
//! implements. This crate has no I/O of its own.

pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;

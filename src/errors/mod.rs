//! # Error Handling
//!
//! Error handling for per-filter configuration translation. Every failure
//! aborts the current call and is returned to the caller unchanged; nothing
//! here retries.

pub mod types;

pub use types::{BoxError, FilterBindError, Result};

/// Short alias used across the crate
pub type Error = FilterBindError;

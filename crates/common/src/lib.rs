//! Shared helpers for the insurance client crates: logging setup, runtime
//! environment checks and display formatting.

pub mod utils;
pub mod env;
pub mod format;

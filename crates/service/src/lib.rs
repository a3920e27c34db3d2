//! Client-side service layer for the insurance app.
//! - Session and policy/claim cache with write-through persistence.
//! - Gateway functions for the backend API.
//! - Route guard and headless page controllers driving both.

pub mod errors;
pub mod storage;
pub mod state;
pub mod api;
pub mod directory;
pub mod guard;
pub mod pricing;
pub mod controllers;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

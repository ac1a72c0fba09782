//! Error handling
//!
//! Defines error types and handling for the reflector.

pub mod handlers;
pub mod types;

pub use types::*;

//! Core business logic for jot.

pub mod patch;
pub mod services;

pub use services::*;

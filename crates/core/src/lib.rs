//! Core business logic for reels-rs.

pub mod services;

pub use services::*;

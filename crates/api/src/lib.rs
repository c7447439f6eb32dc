//! HTTP API layer for reels-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: reels, embedded comments, and account routes
//! - **Extractors**: the authenticated caller
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::router;

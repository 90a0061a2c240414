//! HTTP API layer for jot.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, folders, notes and tags
//! - **Extractors**: Authentication
//! - **Middleware**: Shared state and bearer-token auth
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

//! HTTP surface of the feedback service.
//!
//! Exposes the router, the shared application state and the standard response envelope so the
//! binary and the integration tests build the exact same application.

pub mod response;
pub mod routes;
pub mod state;

//! # feedback Routes Module
//!
//! This module defines and wires up routes for the `/retroalimentacion` endpoint.
//!
//! ## Structure
//! - `post.rs` — POST handler that runs the feedback pipeline

pub mod post;

use crate::state::AppState;
use axum::{Router, routing::post};
use post::generate_feedback;

/// Builds the `/retroalimentacion` route group.
///
/// - `POST /retroalimentacion` → `generate_feedback`
pub fn feedback_routes() -> Router<AppState> {
    Router::new().route("/", post(generate_feedback))
}

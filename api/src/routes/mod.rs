//! HTTP route entry point.
//!
//! Route groups include:
//! - `/health` → Health check endpoint, reporting the configured backend and model
//! - `/retroalimentacion` → Feedback generation for a single submission

use crate::routes::{feedback::feedback_routes, health::health_routes};
use crate::state::AppState;
use axum::Router;

pub mod feedback;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// # Route Structure:
/// - `GET /health` → Health check (never calls the generation service).
/// - `POST /retroalimentacion` → Generates feedback for the submission in the body.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/retroalimentacion", feedback_routes())
        .with_state(app_state)
}

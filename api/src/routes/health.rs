use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

/// Builds the `/health` route group.
///
/// This includes a single `GET /health` endpoint. Useful for uptime checks, load balancers,
/// or deployment health monitoring.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub backend: String,
    pub model: String,
}

/// GET /health
///
/// Reports that the service is up and which generation backend it is configured for.
/// Credentials are not checked here.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "ok": true, "backend": "openrouter", "model": "mistralai/mistral-nemo" },
///   "message": "Health check passed"
/// }
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let generator = state.generator();
    let data = HealthResponse {
        ok: true,
        backend: generator.backend().to_string(),
        model: generator.model().to_string(),
    };
    Json(ApiResponse::success(data, "Health check passed"))
}

#[cfg(test)]
mod tests {
    use super::health_check;
    use crate::state::AppState;
    use axum::body::to_bytes;
    use axum::extract::State;
    use axum::response::IntoResponse;
    use marker::feedback::canned_feedback::CannedFeedback;
    use marker::types::{ClipLimits, GenerationSettings};
    use serde_json::Value;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_check_returns_ok_json() {
        let state = AppState::new(
            Arc::new(CannedFeedback::new("")),
            ClipLimits::default(),
            GenerationSettings::default(),
        );
        let response = health_check(State(state)).await.into_response();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["ok"], true);
        assert_eq!(json["data"]["backend"], "canned");
        assert_eq!(json["data"]["model"], "canned");
        assert_eq!(json["message"], "Health check passed");
    }
}

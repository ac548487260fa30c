use api::{routes::routes, state::AppState};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use marker::feedback::openrouter_feedback::{OpenRouterFeedback, OpenRouterSettings};
use marker::traits::feedback::FeedbackGenerator;
use marker::types::{ClipLimits, GenerationSettings};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Builds the application router around `generator` with default limits and settings.
pub fn make_test_app(generator: impl FeedbackGenerator + 'static) -> Router {
    let state = AppState::new(
        Arc::new(generator),
        ClipLimits::default(),
        GenerationSettings::default(),
    );
    routes(state)
}

/// An OpenRouter generator pointed at a mock server (or any other base URL).
pub fn openrouter_at(base_url: &str, api_key: &str) -> OpenRouterFeedback {
    OpenRouterFeedback::new(OpenRouterSettings {
        url: format!("{base_url}/api/v1/chat/completions"),
        api_key: api_key.into(),
        model: "mistralai/mistral-nemo".into(),
        http_referrer: None,
        app_title: Some("VPL LLM Feedback UMA".into()),
        timeout: Duration::from_secs(5),
    })
    .expect("client builds")
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

use axum::{Json, http::StatusCode};
use marker::error::MarkerError;
use serde::Serialize;
use serde_json::{Value, json};

/// Standardized API response wrapper for outgoing JSON responses.
///
/// This struct enforces a consistent response structure across endpoints:
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is a boolean indicating operation status.
/// - `message` provides a human-readable context string.
///
/// ## Example (error):
/// ```json
/// {
///   "success": false,
///   "data": { "openrouter_error": { "error": { "message": "Rate limit exceeded" } } },
///   "message": "OpenRouter respondió con estado 429"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response carrying diagnostic `data`.
    pub fn error_with(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}

/// Maps a [`MarkerError`] to its HTTP status and error envelope.
///
/// | error               | status                         | `data`                     |
/// |---------------------|--------------------------------|----------------------------|
/// | `MissingCredential` | 500                            | `{}`                       |
/// | `InvalidRequest`    | 400                            | `{"raw_sample": ...}`      |
/// | `Transport`         | 502                            | `{}`                       |
/// | `Upstream`          | the service's own status       | `{"openrouter_error": ...}`|
/// | `MalformedResponse` | 502                            | `{"response": ...}`        |
pub fn error_response(err: &MarkerError) -> (StatusCode, Json<ApiResponse<Value>>) {
    let message = err.to_string();
    let (status, data) = match err {
        MarkerError::MissingCredential(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!({})),
        MarkerError::InvalidRequest { raw_sample, .. } => {
            (StatusCode::BAD_REQUEST, json!({ "raw_sample": raw_sample }))
        }
        MarkerError::Transport(_) => (StatusCode::BAD_GATEWAY, json!({})),
        MarkerError::Upstream { status, detail } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            json!({ "openrouter_error": detail }),
        ),
        MarkerError::MalformedResponse(body) => {
            (StatusCode::BAD_GATEWAY, json!({ "response": body }))
        }
    };

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), "{message}");
    } else {
        tracing::warn!(status = status.as_u16(), "{message}");
    }

    (status, Json(ApiResponse::error_with(data, message)))
}

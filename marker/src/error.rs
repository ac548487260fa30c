//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers every failure that terminates a
//! feedback request. Failures that the pipeline recovers from locally (a single evidence
//! strategy not matching, a `NOTA_IA` line with an unexpected shape) are never represented here:
//! they degrade to "no data" sentinels inside a successful [`crate::types::FinalResult`].
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn require_key(key: &str) -> Result<(), MarkerError> {
//!     if key.is_empty() {
//!         return Err(MarkerError::MissingCredential("OPENROUTER_API_KEY".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use serde_json::Value;

/// Represents all error types that can end a feedback request.
#[derive(Debug, thiserror::Error)]
pub enum MarkerError {
    /// A required credential is not configured.
    #[error("Falta {0} en variables de entorno")]
    MissingCredential(String),

    /// The request body is not a JSON object.
    #[error("{message}")]
    InvalidRequest {
        message: String,
        /// Leading excerpt of the raw body, for diagnostics.
        raw_sample: String,
    },

    /// The generation service could not be reached (network error or timeout).
    #[error("Error de red al contactar OpenRouter: {0}")]
    Transport(String),

    /// The generation service answered with a non-success status.
    #[error("OpenRouter respondió con estado {status}")]
    Upstream { status: u16, detail: Value },

    /// The generation service answered 200 but without the expected content.
    #[error("Respuesta inesperada del modelo: {0}")]
    MalformedResponse(String),
}

impl MarkerError {
    /// Builds an [`MarkerError::InvalidRequest`] keeping the first 200 characters of the body.
    pub fn invalid_request(message: impl Into<String>, raw: &[u8]) -> Self {
        let raw_sample = String::from_utf8_lossy(raw).chars().take(200).collect();
        MarkerError::InvalidRequest {
            message: message.into(),
            raw_sample,
        }
    }
}

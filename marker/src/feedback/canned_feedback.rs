//! Canned feedback generator: returns a fixed text instead of calling a model.
//!
//! Useful to run the pipeline offline and to drive it deterministically in tests.

use crate::error::MarkerError;
use crate::traits::feedback::{FeedbackGenerator, GenerationRequest};
use async_trait::async_trait;
use std::sync::Mutex;

pub struct CannedFeedback {
    text: String,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl CannedFeedback {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request received, for inspecting assembled prompts.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeedbackGenerator for CannedFeedback {
    fn backend(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, MarkerError> {
        if let Ok(mut slot) = self.last_request.lock() {
            *slot = Some(request.clone());
        }
        Ok(self.text.clone())
    }
}

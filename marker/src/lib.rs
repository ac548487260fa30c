//! # Marker Library
//!
//! This module provides the core logic for generating automated feedback on programming
//! submissions. It grades execution evidence on the server, assembles a prompt for an external
//! text-generation service and reconciles the generated text with the server-side grade.
//!
//! ## Key Concepts
//! - **FeedbackJob**: The main struct representing a feedback job for a single submission.
//! - **Evidence parser**: Ordered strategies that turn execution evidence into `(passed, total)`.
//! - **Feedback generators**: Pluggable backends that turn a prompt into text (OpenRouter, canned).
//! - **Reconciler**: Post-processing that purges forbidden lines, extracts the generator's own
//!   grade and splices the server case summary into the feedback.

pub mod error;
pub mod feedback;
pub mod parsers;
pub mod prompt;
pub mod reconcile;
pub mod report;
pub mod scorer;
pub mod traits;
pub mod types;
pub mod utilities;

use crate::error::MarkerError;
use crate::parsers::evidence_parser::EvidenceParser;
use crate::report::{DEFAULT_SUMMARY_LEN, build_case_summary};
use crate::traits::feedback::{FeedbackGenerator, GenerationRequest};
use crate::traits::parser::Parser;
use crate::types::{ClipLimits, FinalResult, GenerationSettings, Submission};

/// Represents a feedback job for a single student submission.
///
/// # Fields
/// - `submission`: The decoded submission.
/// - `generator`: Backend used to produce the feedback text.
/// - `limits`: Character budgets for the clipped prompt blocks.
/// - `settings`: Sampling settings forwarded to the generator.
pub struct FeedbackJob<'a> {
    submission: Submission,
    generator: &'a dyn FeedbackGenerator,
    limits: ClipLimits,
    settings: GenerationSettings,
}

impl<'a> FeedbackJob<'a> {
    /// Create a new feedback job with default limits and settings.
    pub fn new(submission: Submission, generator: &'a dyn FeedbackGenerator) -> Self {
        Self {
            submission,
            generator,
            limits: ClipLimits::default(),
            settings: GenerationSettings::default(),
        }
    }

    /// Override the prompt clipping budgets.
    pub fn with_limits(mut self, limits: ClipLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Override the sampling settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run the feedback pipeline.
    ///
    /// # Steps
    /// 1. Checks the generator credentials.
    /// 2. Grades the evidence, if any.
    /// 3. Assembles the prompt and calls the generator.
    /// 4. Builds the case summary and reconciles it with the generated text.
    ///
    /// # Returns
    /// * `Ok(FinalResult)` with the feedback and the reconciled grades.
    /// * `Err(MarkerError)` if credentials are missing or the generator call fails.
    pub async fn run(self) -> Result<FinalResult, MarkerError> {
        self.generator.check_credentials()?;

        let evidence = self.submission.evidence.as_ref();
        let grade = EvidenceParser.parse(evidence);

        let payload = prompt::assemble(&self.submission, grade.as_ref(), self.limits);
        let request =
            GenerationRequest::new(payload.instructions, payload.user_prompt, self.settings);

        tracing::info!(
            backend = self.generator.backend(),
            model = self.generator.model(),
            has_evidence = evidence.is_some(),
            graded = grade.is_some(),
            "requesting feedback"
        );
        let raw = self.generator.generate(&request).await?;

        let case_summary = build_case_summary(evidence, DEFAULT_SUMMARY_LEN);
        Ok(reconcile::reconcile(&raw, grade.as_ref(), &case_summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::canned_feedback::CannedFeedback;
    use crate::reconcile::CASE_SUMMARY_LABEL;
    use crate::types::{Evidence, NOT_AVAILABLE, NOT_PROVIDED};
    use async_trait::async_trait;
    use serde_json::json;

    const REPLY: &str = "Corrección\n- Resumen: correcto.\nNOTA_TESTS: 10\nNOTA_IA: 9 - claro";

    struct Unconfigured;

    #[async_trait]
    impl FeedbackGenerator for Unconfigured {
        fn backend(&self) -> &str {
            "test"
        }
        fn model(&self) -> &str {
            "test"
        }
        fn check_credentials(&self) -> Result<(), MarkerError> {
            Err(MarkerError::MissingCredential("OPENROUTER_API_KEY".into()))
        }
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, MarkerError> {
            panic!("generate must not be called without credentials");
        }
    }

    struct Failing;

    #[async_trait]
    impl FeedbackGenerator for Failing {
        fn backend(&self) -> &str {
            "test"
        }
        fn model(&self) -> &str {
            "test"
        }
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, MarkerError> {
            Err(MarkerError::Transport("connection refused".into()))
        }
    }

    fn submission() -> Submission {
        Submission {
            code: "def f(n):\n    return n * 2".into(),
            statement: "Duplica".into(),
            ..Submission::default()
        }
    }

    #[tokio::test]
    async fn test_feedback_with_structured_cases() {
        let generator = CannedFeedback::new(REPLY);
        let mut s = submission();
        s.evidence = Some(Evidence::Structured(json!({
            "cases": [
                {"id": "c1", "ok": true},
                {"id": "c2", "ok": false, "expected": "4", "got": "5"}
            ]
        })));

        let result = FeedbackJob::new(s, &generator).run().await.unwrap();

        assert_eq!(result.nota_tests, "5");
        assert_eq!(result.nota_ia, "9");
        assert_eq!(result.nota, "7");
        assert_eq!(result.nota_ia_comentario, "claro");
        assert!(!result.feedback.contains("NOTA_TESTS"));
        assert!(result.feedback.contains(CASE_SUMMARY_LABEL));
        assert!(result.feedback.contains("- c2: ✘"));
        assert!(result.feedback.ends_with("NOTA_IA: 9 - claro"));

        let request = generator.last_request().unwrap();
        assert!(request.conversation[1].content.contains("1/2 casos (nota por casos = 5/10)"));
    }

    #[tokio::test]
    async fn test_feedback_without_evidence() {
        let generator = CannedFeedback::new("Sin datos de ejecución.");
        let result = FeedbackJob::new(submission(), &generator)
            .run()
            .await
            .unwrap();

        assert_eq!(result.nota, NOT_PROVIDED);
        assert_eq!(result.nota_tests, NOT_AVAILABLE);
        assert_eq!(result.nota_ia, NOT_AVAILABLE);
        assert_eq!(result.feedback, "Sin datos de ejecución.");

        let request = generator.last_request().unwrap();
        assert!(!request.conversation[1].content.contains("RESUMEN SERVIDOR"));
    }

    #[tokio::test]
    async fn test_feedback_with_ungradable_evidence() {
        let generator = CannedFeedback::new("NOTA_IA: 6 - aceptable");
        let mut s = submission();
        s.evidence = Some(Evidence::Text("todo fue bien".into()));

        let result = FeedbackJob::new(s, &generator).run().await.unwrap();

        assert_eq!(result.nota_tests, NOT_AVAILABLE);
        assert_eq!(result.nota, "6");
        let request = generator.last_request().unwrap();
        assert!(request.conversation[1].content.contains("todo fue bien"));
    }

    #[tokio::test]
    async fn test_settings_are_forwarded() {
        let generator = CannedFeedback::new("ok");
        let settings = GenerationSettings {
            temperature: 0.7,
            max_output_tokens: 200,
        };
        FeedbackJob::new(submission(), &generator)
            .with_settings(settings)
            .run()
            .await
            .unwrap();

        let request = generator.last_request().unwrap();
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_output_tokens, 200);
    }

    #[tokio::test]
    async fn test_limits_are_applied() {
        let generator = CannedFeedback::new("ok");
        let mut s = submission();
        s.evidence = Some(Evidence::Text("x".repeat(500)));
        FeedbackJob::new(s, &generator)
            .with_limits(ClipLimits {
                evidence: 50,
                ..ClipLimits::default()
            })
            .run()
            .await
            .unwrap();

        let request = generator.last_request().unwrap();
        assert!(request.conversation[1].content.contains("[... 450 chars omitidos ...]"));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_first() {
        let err = FeedbackJob::new(submission(), &Unconfigured)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_generator_errors_propagate() {
        let err = FeedbackJob::new(submission(), &Failing)
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::Transport(_)));
    }
}

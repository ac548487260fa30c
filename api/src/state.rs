use marker::error::MarkerError;
use marker::feedback::openrouter_feedback::OpenRouterFeedback;
use marker::traits::feedback::FeedbackGenerator;
use marker::types::{ClipLimits, GenerationSettings};
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
///
/// Holds the feedback generator (and through it the pooled HTTP client) plus the prompt
/// budgets and sampling settings read from the configuration at startup.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn FeedbackGenerator>,
    limits: ClipLimits,
    settings: GenerationSettings,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn FeedbackGenerator>,
        limits: ClipLimits,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            limits,
            settings,
        }
    }

    /// Builds the production state: an OpenRouter generator plus limits and settings from
    /// `util::config`.
    pub fn from_config() -> Result<Self, MarkerError> {
        let generator = OpenRouterFeedback::from_config()?;
        Ok(Self::new(
            Arc::new(generator),
            ClipLimits::from_config(),
            GenerationSettings::from_config(),
        ))
    }

    pub fn generator(&self) -> &dyn FeedbackGenerator {
        self.generator.as_ref()
    }

    pub fn limits(&self) -> ClipLimits {
        self.limits
    }

    pub fn settings(&self) -> GenerationSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use util::config::AppConfig;

    #[test]
    #[serial]
    fn from_config_reads_the_global_config() {
        AppConfig::set_openrouter_api_key("");
        AppConfig::set_openrouter_model("openai/gpt-4o-mini");
        AppConfig::set_evidence_max_chars(1234);
        AppConfig::set_cases_max_chars(555);
        AppConfig::set_constraints_max_chars(321);

        let state = AppState::from_config().unwrap();
        assert_eq!(state.generator().backend(), "openrouter");
        assert_eq!(state.generator().model(), "openai/gpt-4o-mini");
        assert!(state.generator().check_credentials().is_err());
        assert_eq!(
            state.limits(),
            ClipLimits {
                evidence: 1234,
                cases: 555,
                constraints: 321,
            }
        );

        AppConfig::set_openrouter_api_key("sk-or-test");
        assert!(AppState::from_config().unwrap().generator().check_credentials().is_ok());

        AppConfig::reset();
    }
}

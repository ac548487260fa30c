//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mistral-nemo";
pub const DEFAULT_APP_TITLE: &str = "VPL LLM Feedback UMA";

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    /// Empty when unset; checked per request, not at startup.
    pub openrouter_api_key: String,
    pub openrouter_url: String,
    pub openrouter_model: String,
    pub openrouter_http_referrer: Option<String>,
    pub openrouter_app_title: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub evidence_max_chars: usize,
    pub cases_max_chars: usize,
    pub constraints_max_chars: usize,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{key}={raw:?} is not valid, using the default");
            default
        }),
        Err(_) => default,
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Nothing here is mandatory: a missing API key is reported when a request
    /// needs it, so the health endpoint keeps working on a bare environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        // RESTRICCIONES_MAX_CHARS wins; INSTRUCCIONES_MAX_CHARS is the legacy name.
        let constraints_max_chars = if env::var("RESTRICCIONES_MAX_CHARS").is_ok() {
            parsed_or("RESTRICCIONES_MAX_CHARS", 3000)
        } else {
            parsed_or("INSTRUCCIONES_MAX_CHARS", 3000)
        };

        Self {
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "vpl-feedback".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,marker=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "true".into()) == "true",
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parsed_or("PORT", 8000),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").unwrap_or_default(),
            openrouter_url: env::var("OPENROUTER_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_URL.into()),
            openrouter_model: env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.into()),
            openrouter_http_referrer: non_empty("OPENROUTER_HTTP_REFERRER"),
            openrouter_app_title: match env::var("OPENROUTER_APP_TITLE") {
                Ok(v) if v.trim().is_empty() => None,
                Ok(v) => Some(v),
                Err(_) => Some(DEFAULT_APP_TITLE.into()),
            },
            temperature: parsed_or("TEMPERATURE", 0.2),
            max_tokens: parsed_or("MAX_TOKENS", 1600),
            timeout_secs: parsed_or("TIMEOUT", 60),
            evidence_max_chars: parsed_or("EVIDENCIA_MAX_CHARS", 6000),
            cases_max_chars: parsed_or("CASOS_MAX_CHARS", 4000),
            constraints_max_chars,
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    ///
    /// Used by public per-field setter methods.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_openrouter_api_key(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openrouter_api_key = value.into());
    }

    pub fn set_openrouter_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openrouter_url = value.into());
    }

    pub fn set_openrouter_model(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.openrouter_model = value.into());
    }

    pub fn set_openrouter_http_referrer(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.openrouter_http_referrer = value);
    }

    pub fn set_openrouter_app_title(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.openrouter_app_title = value);
    }

    pub fn set_timeout_secs(value: u64) {
        AppConfig::set_field(|cfg| cfg.timeout_secs = value);
    }

    pub fn set_evidence_max_chars(value: usize) {
        AppConfig::set_field(|cfg| cfg.evidence_max_chars = value);
    }

    pub fn set_cases_max_chars(value: usize) {
        AppConfig::set_field(|cfg| cfg.cases_max_chars = value);
    }

    pub fn set_constraints_max_chars(value: usize) {
        AppConfig::set_field(|cfg| cfg.constraints_max_chars = value);
    }
}

// --- Free accessors, so call sites read `config::port()` ---

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn openrouter_api_key() -> String {
    AppConfig::global().openrouter_api_key.clone()
}

pub fn openrouter_url() -> String {
    AppConfig::global().openrouter_url.clone()
}

pub fn openrouter_model() -> String {
    AppConfig::global().openrouter_model.clone()
}

pub fn openrouter_http_referrer() -> Option<String> {
    AppConfig::global().openrouter_http_referrer.clone()
}

pub fn openrouter_app_title() -> Option<String> {
    AppConfig::global().openrouter_app_title.clone()
}

pub fn temperature() -> f32 {
    AppConfig::global().temperature
}

pub fn max_tokens() -> u32 {
    AppConfig::global().max_tokens
}

pub fn timeout_secs() -> u64 {
    AppConfig::global().timeout_secs
}

pub fn evidence_max_chars() -> usize {
    AppConfig::global().evidence_max_chars
}

pub fn cases_max_chars() -> usize {
    AppConfig::global().cases_max_chars
}

pub fn constraints_max_chars() -> usize {
    AppConfig::global().constraints_max_chars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn setters_override_global_values() {
        AppConfig::set_port(9123);
        AppConfig::set_openrouter_api_key("sk-or-test");
        AppConfig::set_openrouter_url("http://localhost:4010/v1/chat/completions");
        AppConfig::set_openrouter_model("test/model");
        AppConfig::set_openrouter_http_referrer(Some("https://vpl.example.org".into()));
        AppConfig::set_openrouter_app_title(None);
        AppConfig::set_timeout_secs(5);
        AppConfig::set_evidence_max_chars(42);
        AppConfig::set_cases_max_chars(43);
        AppConfig::set_constraints_max_chars(44);

        assert_eq!(port(), 9123);
        assert_eq!(openrouter_api_key(), "sk-or-test");
        assert_eq!(openrouter_url(), "http://localhost:4010/v1/chat/completions");
        assert_eq!(openrouter_model(), "test/model");
        assert_eq!(
            openrouter_http_referrer().as_deref(),
            Some("https://vpl.example.org")
        );
        assert_eq!(openrouter_app_title(), None);
        assert_eq!(timeout_secs(), 5);
        assert_eq!(evidence_max_chars(), 42);
        assert_eq!(cases_max_chars(), 43);
        assert_eq!(constraints_max_chars(), 44);

        AppConfig::reset();
    }

    #[test]
    #[serial]
    fn unparseable_numbers_fall_back_to_defaults() {
        // SAFETY: tests touching the process environment run serially.
        unsafe {
            env::set_var("CASOS_MAX_CHARS", "not-a-number");
            env::set_var("TEMPERATURE", "0.7");
        }
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.cases_max_chars, 4000);
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
        unsafe {
            env::remove_var("CASOS_MAX_CHARS");
            env::remove_var("TEMPERATURE");
        }
    }

    #[test]
    #[serial]
    fn legacy_constraint_limit_is_honoured() {
        unsafe {
            env::remove_var("RESTRICCIONES_MAX_CHARS");
            env::set_var("INSTRUCCIONES_MAX_CHARS", "1234");
        }
        assert_eq!(AppConfig::from_env().constraints_max_chars, 1234);

        unsafe {
            env::set_var("RESTRICCIONES_MAX_CHARS", "777");
        }
        assert_eq!(AppConfig::from_env().constraints_max_chars, 777);

        unsafe {
            env::remove_var("RESTRICCIONES_MAX_CHARS");
            env::remove_var("INSTRUCCIONES_MAX_CHARS");
        }
    }

    #[test]
    #[serial]
    fn blank_app_title_disables_the_header() {
        unsafe {
            env::set_var("OPENROUTER_APP_TITLE", "  ");
        }
        assert_eq!(AppConfig::from_env().openrouter_app_title, None);
        unsafe {
            env::remove_var("OPENROUTER_APP_TITLE");
        }
        assert_eq!(
            AppConfig::from_env().openrouter_app_title.as_deref(),
            Some(DEFAULT_APP_TITLE)
        );
    }
}

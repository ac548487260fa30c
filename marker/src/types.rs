//! # Types Module
//!
//! This module defines the core data structures that flow through the feedback pipeline:
//! the parsed [`Submission`], its optional [`Evidence`], the server-side [`GradeResult`],
//! the [`CaseRecord`]s of a structured evidence payload and the terminal [`FinalResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use util::config;

/// Sentinel for a grade that could not be determined.
pub const NOT_AVAILABLE: &str = "No disponible";
/// Sentinel for a reconciled grade when neither source produced one.
pub const NOT_PROVIDED: &str = "No proporcionada";

/// Loose truthiness of a JSON value: `null`, `false`, `0`, `""`, `[]` and `{}` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renders a JSON value as plain text: strings verbatim, `null` as empty, anything else as JSON.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Test-execution evidence attached to a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    /// A JSON value sent as-is in the request body.
    Structured(Value),
    /// Free-form text: a runner log, or JSON serialized into a string.
    Text(String),
}

impl Evidence {
    /// Wraps a request value, treating falsy values as "no evidence".
    pub fn from_value(value: Value) -> Option<Self> {
        if !is_truthy(&value) {
            return None;
        }
        match value {
            Value::String(s) => Some(Evidence::Text(s)),
            other => Some(Evidence::Structured(other)),
        }
    }

    /// The evidence as a JSON value, parsing text payloads when they hold JSON.
    pub fn as_json(&self) -> Option<Cow<'_, Value>> {
        match self {
            Evidence::Structured(v) => Some(Cow::Borrowed(v)),
            Evidence::Text(s) => serde_json::from_str::<Value>(s).ok().map(Cow::Owned),
        }
    }

    /// The raw text, if the evidence was sent as a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Evidence::Text(s) => Some(s),
            Evidence::Structured(_) => None,
        }
    }

    /// The evidence exactly as it would be printed, without pretty-printing.
    pub fn to_plain_string(&self) -> String {
        match self {
            Evidence::Text(s) => s.clone(),
            Evidence::Structured(v) => v.to_string(),
        }
    }
}

/// Canonical outcome of the automated tests.
///
/// Always satisfies `passed <= total`, `total > 0` and `grade` in `0..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeResult {
    pub passed: u32,
    pub total: u32,
    pub grade: u8,
}

impl GradeResult {
    /// Builds a result from raw counts, rejecting counts that break the invariants.
    pub fn from_counts(passed: u32, total: u32) -> Option<Self> {
        if total == 0 || passed > total {
            return None;
        }
        Some(Self {
            passed,
            total,
            grade: crate::scorer::grade_from_counts(passed, total),
        })
    }

    /// One-line digest shown to the generator, e.g. `7/10 casos (nota por casos = 7/10)`.
    pub fn summary(&self) -> String {
        format!(
            "{}/{} casos (nota por casos = {}/10)",
            self.passed, self.total, self.grade
        )
    }
}

/// One element of a structured `cases` evidence list.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub id: String,
    pub ok: bool,
    pub expected: Option<String>,
    pub output: Option<String>,
}

impl CaseRecord {
    /// Reads a case from a JSON element; non-object elements are not cases.
    ///
    /// Only a literal `true` in `ok` counts as passing.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text_field = |key: &str| match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(v) => Some(value_to_text(v)),
        };
        Some(Self {
            id: obj
                .get("id")
                .map(value_to_text)
                .unwrap_or_else(|| "caso".to_string()),
            ok: matches!(obj.get("ok"), Some(Value::Bool(true))),
            expected: text_field("expected"),
            output: text_field("output"),
        })
    }
}

/// The `cases` array of a JSON payload, if it has one.
pub fn cases_of(value: &Value) -> Option<&Vec<Value>> {
    value.as_object()?.get("cases")?.as_array()
}

/// A student submission as received by the feedback endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    /// `codigo`
    pub code: String,
    /// `enunciado`
    pub statement: String,
    /// `codigo_base`
    pub base_code: String,
    /// `casos_prueba`, text or structured.
    pub test_cases: Value,
    /// `restricciones`, or the legacy `instrucciones`.
    pub constraints: String,
    /// `resultados_casos`, or the legacy `biotes_log`.
    pub evidence: Option<Evidence>,
}

impl Submission {
    /// Reads a submission from a decoded request body.
    ///
    /// `instrucciones` is only consulted when `restricciones` is absent or `null`, while
    /// `biotes_log` is consulted whenever `resultados_casos` is falsy.
    pub fn from_json(body: &Value) -> Option<Self> {
        let obj = body.as_object()?;
        let text = |key: &str| obj.get(key).map(value_to_text).unwrap_or_default();

        let constraints = match obj.get("restricciones") {
            None | Some(Value::Null) => obj.get("instrucciones"),
            Some(v) => Some(v),
        }
        .filter(|v| is_truthy(v))
        .map(value_to_text)
        .unwrap_or_default();

        let evidence = obj
            .get("resultados_casos")
            .filter(|v| is_truthy(v))
            .or_else(|| obj.get("biotes_log"))
            .cloned()
            .and_then(Evidence::from_value);

        Some(Self {
            code: text("codigo"),
            statement: text("enunciado"),
            base_code: text("codigo_base"),
            test_cases: obj.get("casos_prueba").cloned().unwrap_or(Value::Null),
            constraints,
            evidence,
        })
    }
}

/// Character budgets for the clipped prompt blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipLimits {
    pub evidence: usize,
    pub cases: usize,
    pub constraints: usize,
}

impl Default for ClipLimits {
    fn default() -> Self {
        Self {
            evidence: 6000,
            cases: 4000,
            constraints: 3000,
        }
    }
}

impl ClipLimits {
    pub fn from_config() -> Self {
        Self {
            evidence: config::evidence_max_chars(),
            cases: config::cases_max_chars(),
            constraints: config::constraints_max_chars(),
        }
    }
}

/// Sampling parameters forwarded to the generation service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 1600,
        }
    }
}

impl GenerationSettings {
    pub fn from_config() -> Self {
        Self {
            temperature: config::temperature(),
            max_output_tokens: config::max_tokens(),
        }
    }
}

/// The terminal artifact of a feedback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    #[serde(rename = "retroalimentacion")]
    pub feedback: String,
    /// Reconciled grade, or [`NOT_PROVIDED`].
    pub nota: String,
    /// Server-computed test grade, or [`NOT_AVAILABLE`].
    pub nota_tests: String,
    /// Generator self-reported grade, or [`NOT_AVAILABLE`].
    pub nota_ia: String,
    pub nota_ia_comentario: String,
}

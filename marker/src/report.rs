//! Case Summary Report
//!
//! Renders the per-case outcome of a structured evidence payload as a short, human-readable
//! digest that is appended to the generated feedback. The digest is computed on the server so
//! the student always sees the real results, whatever the generator wrote.
//!
//! ```text
//! Resumen de casos (servidor): 1/2 pasan
//! - caso1: ✔
//! - caso2: ✘
//!     esperado: 7
//!     obtenido: -7
//! ```

use crate::types::{CaseRecord, Evidence, cases_of};
use crate::utilities::clip::{clip, truncate_chars};

/// Default budget for the whole digest.
pub const DEFAULT_SUMMARY_LEN: usize = 2000;

/// Budget for each `esperado` / `obtenido` excerpt.
const EXCERPT_LEN: usize = 300;

/// Builds the digest for `evidence`, at most `max_len` characters.
///
/// Absent evidence gives an empty string; evidence without a `cases` list is clipped as-is.
pub fn build_case_summary(evidence: Option<&Evidence>, max_len: usize) -> String {
    let Some(evidence) = evidence else {
        return String::new();
    };

    if let Some(data) = evidence.as_json() {
        if let Some(cases) = cases_of(&data) {
            let records: Vec<CaseRecord> = cases.iter().filter_map(CaseRecord::from_value).collect();
            let passed = records.iter().filter(|c| c.ok).count();

            let mut lines = vec![format!(
                "Resumen de casos (servidor): {passed}/{} pasan",
                cases.len()
            )];
            for case in &records {
                lines.push(format!("- {}: {}", case.id, if case.ok { "✔" } else { "✘" }));
                if case.ok {
                    continue;
                }
                if let Some(expected) = &case.expected {
                    lines.push(format!("    esperado: {}", excerpt(expected)));
                }
                if let Some(output) = &case.output {
                    lines.push(format!("    obtenido: {}", excerpt(output)));
                }
            }
            return truncate_chars(&lines.join("\n"), max_len);
        }
    }

    clip(&evidence.to_plain_string(), max_len)
}

fn excerpt(text: &str) -> String {
    truncate_chars(text.trim(), EXCERPT_LEN)
}

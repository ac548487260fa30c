//! # Feedback Reconciler
//!
//! Post-processes the raw text returned by the generator:
//!
//! 1. **Purge** every `NOTA_TESTS:` line; only the server computes test grades.
//! 2. **Extract** the generator's own grade from the last `NOTA_IA:` line.
//! 3. **Reconcile** it with the server [`GradeResult`] into the final `nota`.
//! 4. **Splice** the server case summary in right before that last `NOTA_IA:` line.
//!
//! A `NOTA_IA:` line that does not match `NOTA_IA: <0-10> - <justificación>` is not an error:
//! the generator grade is simply treated as absent.

use crate::prompt::{FINAL_GRADE_MARKER, FORBIDDEN_GRADE_MARKER};
use crate::scorer::reconcile_grades;
use crate::types::{FinalResult, GradeResult, NOT_AVAILABLE};
use once_cell::sync::Lazy;
use regex::Regex;

static FINAL_GRADE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^NOTA_IA\s*:\s*(10|[0-9])\s*-\s*(.+)$").expect("valid NOTA_IA regex")
});

/// Label of the spliced server block.
pub const CASE_SUMMARY_LABEL: &str = "--- Resumen de casos (servidor) ---";

/// The generator's self-reported grade and its justification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfReportedGrade {
    pub grade: u8,
    pub justification: String,
}

/// Drops every line whose trimmed content starts with `NOTA_TESTS:`.
pub fn purge_forbidden_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().starts_with(FORBIDDEN_GRADE_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Index of the last line starting with `NOTA_IA:`, scanning from the end.
fn last_marker_index(lines: &[&str]) -> Option<usize> {
    lines
        .iter()
        .rposition(|line| line.trim().starts_with(FINAL_GRADE_MARKER))
}

/// Reads the grade from the last `NOTA_IA:` line; earlier marker lines are ignored.
pub fn extract_self_reported(text: &str) -> Option<SelfReportedGrade> {
    let lines: Vec<&str> = text.lines().collect();
    let line = lines[last_marker_index(&lines)?].trim();
    let caps = FINAL_GRADE_LINE.captures(line)?;
    Some(SelfReportedGrade {
        grade: caps[1].parse().ok()?,
        justification: caps[2].trim().to_string(),
    })
}

/// Inserts `summary` as a labelled block before the last `NOTA_IA:` line, or appends it.
///
/// An empty summary leaves the text unchanged.
pub fn splice_case_summary(text: &str, summary: &str) -> String {
    if summary.is_empty() {
        return text.to_string();
    }
    let lines: Vec<&str> = text.lines().collect();

    let Some(anchor) = last_marker_index(&lines) else {
        return format!("{text}\n\n{CASE_SUMMARY_LABEL}\n{summary}");
    };

    let head = lines[..anchor].join("\n");
    let tail = lines[anchor..].join("\n");
    let mut spliced: Vec<&str> = Vec::new();
    let head = head.trim_end();
    if !head.is_empty() {
        spliced.push(head);
        spliced.push("");
    }
    spliced.push(CASE_SUMMARY_LABEL);
    spliced.push(summary);
    spliced.push("");
    spliced.push(tail.trim_end());
    spliced.join("\n").trim().to_string()
}

/// Runs the four reconciliation steps over the generator output.
pub fn reconcile(raw: &str, grade: Option<&GradeResult>, case_summary: &str) -> FinalResult {
    let purged = purge_forbidden_lines(raw.trim());
    let self_reported = extract_self_reported(&purged);

    let tests_grade = grade.map(|g| g.grade);
    let ia_grade = self_reported.as_ref().map(|s| s.grade);
    let nota = reconcile_grades(tests_grade, ia_grade);

    tracing::debug!(
        tests_grade = ?tests_grade,
        ia_grade = ?ia_grade,
        nota = %nota,
        "grades reconciled"
    );

    FinalResult {
        feedback: splice_case_summary(&purged, case_summary),
        nota,
        nota_tests: tests_grade.map_or_else(|| NOT_AVAILABLE.to_string(), |g| g.to_string()),
        nota_ia: ia_grade.map_or_else(|| NOT_AVAILABLE.to_string(), |g| g.to_string()),
        nota_ia_comentario: self_reported.map(|s| s.justification).unwrap_or_default(),
    }
}

//! Evidence Parser
//!
//! This module provides the [`EvidenceParser`], which turns the test evidence attached to a
//! submission into a canonical [`GradeResult`]. Evidence arrives in several dialects, and each
//! one is an [`EvidenceStrategy`] tried in a fixed priority order:
//!
//! 1. [`EvidenceStrategy::ExplicitCounts`]: `{"passed": X, "total": Y}`
//! 2. [`EvidenceStrategy::CaseList`]: `{"cases": [{"ok": true, ...}, ...]}`
//! 3. [`EvidenceStrategy::BiotesLog`]: the BIOTES runner text log
//! 4. [`EvidenceStrategy::Fraction`]: the last valid `a/b` in free text
//!
//! A strategy that does not recognise the payload, or whose counts break the
//! [`GradeResult`] invariants, simply yields nothing and the next one is tried. Parsing never
//! fails; it returns `None` when no strategy matches.

use crate::parsers::biotes_parser;
use crate::traits::parser::Parser;
use crate::types::{CaseRecord, Evidence, GradeResult, cases_of};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid fraction regex"));

/// One evidence dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceStrategy {
    ExplicitCounts,
    CaseList,
    BiotesLog,
    Fraction,
}

impl EvidenceStrategy {
    /// Priority order; the first strategy that yields counts wins.
    pub const ORDER: [EvidenceStrategy; 4] = [
        EvidenceStrategy::ExplicitCounts,
        EvidenceStrategy::CaseList,
        EvidenceStrategy::BiotesLog,
        EvidenceStrategy::Fraction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EvidenceStrategy::ExplicitCounts => "explicit_counts",
            EvidenceStrategy::CaseList => "case_list",
            EvidenceStrategy::BiotesLog => "biotes_log",
            EvidenceStrategy::Fraction => "fraction",
        }
    }

    /// Runs this strategy alone, returning `(passed, total)` if it recognises the payload.
    pub fn attempt(self, evidence: &Evidence) -> Option<(u32, u32)> {
        match self {
            EvidenceStrategy::ExplicitCounts => explicit_counts(&*evidence.as_json()?),
            EvidenceStrategy::CaseList => case_list_counts(&*evidence.as_json()?),
            EvidenceStrategy::BiotesLog => {
                let text = evidence.as_text()?;
                if !biotes_parser::looks_like_biotes(text) {
                    return None;
                }
                biotes_parser::parse_counts(text)
            }
            EvidenceStrategy::Fraction => last_valid_fraction(evidence.as_text()?),
        }
    }
}

/// Parser for test evidence, implementing [`Parser`] over optional evidence.
pub struct EvidenceParser;

impl<'a> Parser<Option<&'a Evidence>, Option<GradeResult>> for EvidenceParser {
    fn parse(&self, evidence: Option<&'a Evidence>) -> Option<GradeResult> {
        let evidence = evidence?;
        for strategy in EvidenceStrategy::ORDER {
            let Some((passed, total)) = strategy.attempt(evidence) else {
                tracing::trace!(strategy = strategy.name(), "evidence strategy did not match");
                continue;
            };
            match GradeResult::from_counts(passed, total) {
                Some(result) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        passed,
                        total,
                        grade = result.grade,
                        "evidence graded"
                    );
                    return Some(result);
                }
                None => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        passed,
                        total,
                        "evidence counts out of range, trying next strategy"
                    );
                }
            }
        }
        tracing::debug!("no evidence strategy matched");
        None
    }
}

/// Reads a count the way loosely-typed producers send it: integer, float or numeric string.
fn as_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn explicit_counts(data: &Value) -> Option<(u32, u32)> {
    let obj = data.as_object()?;
    let passed = as_count(obj.get("passed")?)?;
    let total = as_count(obj.get("total")?)?;
    if total > 0 && (0..=total).contains(&passed) {
        Some((u32::try_from(passed).ok()?, u32::try_from(total).ok()?))
    } else {
        None
    }
}

fn case_list_counts(data: &Value) -> Option<(u32, u32)> {
    let cases = cases_of(data)?;
    let total = u32::try_from(cases.len()).ok()?;
    let passed = cases
        .iter()
        .filter_map(CaseRecord::from_value)
        .filter(|case| case.ok)
        .count() as u32;
    (total > 0).then_some((passed, total))
}

/// Scans every `a/b` and returns the last one with `b > 0` and `a <= b`.
fn last_valid_fraction(text: &str) -> Option<(u32, u32)> {
    let fractions: Vec<(u32, u32)> = FRACTION
        .captures_iter(text)
        .filter_map(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
        .collect();
    fractions
        .into_iter()
        .rev()
        .find(|&(a, b)| b > 0 && a <= b)
}

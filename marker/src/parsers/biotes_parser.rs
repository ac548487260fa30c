//! BIOTES Log Parser
//!
//! Extracts `(passed, total)` from the plain-text log produced by the BIOTES test runner.
//! A typical log looks like:
//!
//! ```text
//! Testing 1/3 : suma de positivos
//! Testing 2/3 : suma con cero
//! Testing 3/3 : suma de negativos
//! <|--
//! -Failed tests
//! Test 3: suma de negativos
//!  Incorrect program output
//! --|>
//! ```
//!
//! Older runner versions only print a closing summary:
//!
//! ```text
//! Summary of tests
//! +------------------------------+
//! |  3 tests run/ 2 tests passed |
//! +------------------------------+
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static TESTING_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Testing\s+(\d+)\s*/\s*(\d+)\s*:").expect("valid Testing regex"));

static FAILED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\|--\s*-Failed tests(.*?)--\|>").expect("valid failed-block regex")
});

static FAILED_TEST_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*Test\s+\d+").expect("valid failed-test regex"));

static SUMMARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)Summary of tests.*?(\d+)\s*tests?\s*run.*?(\d+)\s*tests?\s*passed")
        .expect("valid summary regex")
});

/// Cheap gate: only logs carrying BIOTES markers are worth scanning.
pub fn looks_like_biotes(text: &str) -> bool {
    (text.contains("Testing") && text.contains("Failed tests")) || text.contains("Summary of tests")
}

/// Returns `(passed, total)` from a BIOTES log, or `None` when neither layout is found.
///
/// The progress lines are cumulative, so the last `Testing n/m :` line is the authoritative one
/// and its counter `n` is the number of tests that actually ran. On a complete log `n == m`, so
/// reading `n` instead of `m` only matters when the log was cut short. The first failed-test block
/// found is the one counted.
pub fn parse_counts(text: &str) -> Option<(u32, u32)> {
    progress_counts(text).or_else(|| summary_counts(text))
}

fn progress_counts(text: &str) -> Option<(u32, u32)> {
    let total = TESTING_LINE
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .last()?;

    let block = FAILED_BLOCK.captures(text)?;
    let failed = FAILED_TEST_LINE.find_iter(&block[1]).count() as u32;

    Some((total.saturating_sub(failed), total))
}

fn summary_counts(text: &str) -> Option<(u32, u32)> {
    let caps = SUMMARY.captures(text)?;
    let total = caps[1].parse().ok()?;
    let passed = caps[2].parse().ok()?;
    Some((passed, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(name: &str) -> String {
        let path = format!("src/test_files/biotes/{name}");
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
    }

    #[test]
    fn gate_requires_both_markers_or_summary() {
        assert!(looks_like_biotes("Testing 1/1 :\n<|--\n-Failed tests\n--|>"));
        assert!(looks_like_biotes("Summary of tests"));
        assert!(!looks_like_biotes("Testing 1/1 : ok"));
        assert!(!looks_like_biotes("Failed tests: none"));
    }

    #[test]
    fn progress_log_with_failures() {
        let log = fixture("progress_with_failures.txt");
        assert_eq!(parse_counts(&log), Some((3, 5)));
    }

    #[test]
    fn progress_log_without_failures_counts_all_as_passed() {
        let log = "Testing 1/2 : a\nTesting 2/2 : b\n<|--\n-Failed tests\n--|>\n";
        assert_eq!(parse_counts(log), Some((2, 2)));
    }

    #[test]
    fn last_testing_line_wins() {
        let log = "Testing 5/10 : x\nTesting 8/10 : y\n<|--\n-Failed tests\nTest 2: y\n--|>";
        assert_eq!(parse_counts(log), Some((7, 8)));
    }

    #[test]
    fn failed_block_markers_are_case_insensitive() {
        let log = "Testing 4/4 : z\n<|--\n-FAILED TESTS\ntest 1\n  TEST 2: b\n--|>";
        assert_eq!(parse_counts(log), Some((2, 4)));
    }

    #[test]
    fn only_the_first_failed_block_is_counted() {
        let log = "Testing 3/3 :\n<|--\n-Failed tests\nTest 1\n--|>\n<|--\n-Failed tests\nTest 2\nTest 3\n--|>";
        assert_eq!(parse_counts(log), Some((2, 3)));
    }

    #[test]
    fn more_failures_than_tests_floor_at_zero() {
        let log = "Testing 1/1 :\n<|--\n-Failed tests\nTest 1\nTest 2\n--|>";
        assert_eq!(parse_counts(log), Some((0, 1)));
    }

    #[test]
    fn summary_layout_is_the_fallback() {
        let log = fixture("summary_only.txt");
        assert_eq!(parse_counts(&log), Some((2, 3)));
    }

    #[test]
    fn progress_without_block_falls_back_to_summary() {
        let log = "Testing 2/2 : a\nSummary of tests\n 2 tests run/ 1 test passed";
        assert_eq!(parse_counts(log), Some((1, 2)));
    }

    #[test]
    fn nothing_recognisable_is_none() {
        assert_eq!(parse_counts("Summary of tests\nall good"), None);
    }
}

//! # Scorer Module
//!
//! Grade arithmetic for the pipeline: the 0–10 test grade derived from `(passed, total)` and
//! the reconciliation of that grade with the grade the generator reported for itself.

use crate::types::NOT_PROVIDED;

/// Converts test counts to a 0–10 grade.
///
/// A full pass is always 10; anything else is `10 * passed / total` rounded half to even and
/// clamped to `0..=10`. A zero `total` yields 0.
///
/// # Example
///
/// ```
/// use marker::scorer::grade_from_counts;
///
/// assert_eq!(grade_from_counts(10, 10), 10);
/// assert_eq!(grade_from_counts(7, 10), 7);
/// assert_eq!(grade_from_counts(1, 4), 2); // 2.5 rounds to even
/// ```
pub fn grade_from_counts(passed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    if passed == total {
        return 10;
    }
    let raw = (10.0 * passed as f64 / total as f64).round_ties_even();
    raw.clamp(0.0, 10.0) as u8
}

/// Combines the server test grade with the generator grade into the final `nota`.
///
/// Both present: rounded mean (half away from zero). One present: that grade. Neither:
/// the [`NOT_PROVIDED`] sentinel.
pub fn reconcile_grades(tests: Option<u8>, ia: Option<u8>) -> String {
    match (tests, ia) {
        (Some(t), Some(i)) => {
            let mean = (t as f64 + i as f64) / 2.0;
            format!("{}", mean.round() as u8)
        }
        (Some(g), None) | (None, Some(g)) => g.to_string(),
        (None, None) => NOT_PROVIDED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pass_is_ten() {
        for total in 1..=50 {
            assert_eq!(grade_from_counts(total, total), 10);
        }
    }

    #[test]
    fn partial_pass_never_reaches_ten_unless_rounding() {
        assert_eq!(grade_from_counts(0, 5), 0);
        assert_eq!(grade_from_counts(4, 5), 8);
        // 99/100 rounds to 10 even though not every test passed.
        assert_eq!(grade_from_counts(99, 100), 10);
    }

    #[test]
    fn test_grade_ties_round_to_even() {
        assert_eq!(grade_from_counts(1, 4), 2);
        assert_eq!(grade_from_counts(3, 4), 8);
        assert_eq!(grade_from_counts(1, 20), 0);
        assert_eq!(grade_from_counts(3, 20), 2);
    }

    #[test]
    fn zero_total_is_zero() {
        assert_eq!(grade_from_counts(0, 0), 0);
    }

    #[test]
    fn mean_of_both_grades_rounds_half_up() {
        assert_eq!(reconcile_grades(Some(6), Some(9)), "8");
        assert_eq!(reconcile_grades(Some(6), Some(7)), "7");
        assert_eq!(reconcile_grades(Some(4), Some(4)), "4");
    }

    #[test]
    fn single_grade_passes_through() {
        assert_eq!(reconcile_grades(Some(6), None), "6");
        assert_eq!(reconcile_grades(None, Some(3)), "3");
    }

    #[test]
    fn no_grade_is_sentinel() {
        assert_eq!(reconcile_grades(None, None), NOT_PROVIDED);
    }
}

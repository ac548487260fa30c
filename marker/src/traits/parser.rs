//! Parser Trait
//!
//! This module defines the [`Parser`] trait, the common shape of the pipeline's input
//! normalizers. Parsers here are total: malformed input degrades to an empty or absent output
//! instead of an error, so the trait has no error type.
//!
//! # Example
//!
//! ```rust
//! use marker::traits::parser::Parser;
//!
//! struct LineCounter;
//!
//! impl<'a> Parser<&'a str, usize> for LineCounter {
//!     fn parse(&self, input: &'a str) -> usize {
//!         input.lines().count()
//!     }
//! }
//!
//! assert_eq!(LineCounter.parse("a\nb"), 2);
//! ```

/// A generic trait for turning raw request data into a strongly-typed value.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    fn parse(&self, input: Input) -> Output;
}

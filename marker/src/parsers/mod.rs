//! # Parsers Module
//!
//! Input normalizers for the feedback pipeline:
//! - [`evidence_parser`]: grades heterogeneous test evidence.
//! - [`biotes_parser`]: the BIOTES runner log dialect used by the evidence parser.
//! - [`constraint_parser`]: turns constraint text into an `R1..Rn` checklist.

pub mod biotes_parser;
pub mod constraint_parser;
pub mod evidence_parser;

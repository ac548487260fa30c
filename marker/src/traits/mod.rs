//!
//! Traits Module
//!
//! Core seams of the feedback pipeline.
//!
//! - [`feedback`]: the text-generation backend and the request it receives.
//! - [`parser`]: the generic trait implemented by the input normalizers.

pub mod feedback;
pub mod parser;

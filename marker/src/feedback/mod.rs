//! # Feedback Generators Module
//!
//! Implementations of the [`crate::traits::feedback::FeedbackGenerator`] trait.
//!
//! ## Available Generators
//!
//! - [`openrouter_feedback`]: calls the OpenRouter chat-completions API.
//! - [`canned_feedback`]: returns a fixed text, for offline runs and tests.

pub mod canned_feedback;
pub mod openrouter_feedback;

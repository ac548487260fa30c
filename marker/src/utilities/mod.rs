//! # Utilities
//!
//! Text helpers shared by the prompt and report builders:
//! - [`clip`]: head/tail clipping with an omission marker, and hard truncation.
//! - [`pretty`]: JSON-aware rendering of request fields.

pub mod clip;
pub mod pretty;

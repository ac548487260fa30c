//! Shared utilities for the feedback workspace.
//!
//! - [`config`]: environment-backed application configuration.

pub mod config;

//! Parsing module for the Screenplay Editor
//!
//! This module contains the plain-text classifier that turns
//! untyped text into typed screenplay paragraphs.

pub mod classify;

// Re-export commonly used functions
pub use classify::{classify_line, classify_text};

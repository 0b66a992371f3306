//! Screenplay Editor WASM API
//!
//! The JavaScript-facing API for the screenplay editor core.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `core`: The exported operations over the module-owned editor instance
//!
//! All public functions are re-exported from `core`.

pub mod helpers;
pub mod core;

pub use core::*;

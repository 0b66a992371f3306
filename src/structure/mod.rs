//! Layer 2: Script Structure
//!
//! This module derives screenplay structure from the element sequence:
//! which type follows which, what a revision pass marks, and how scenes
//! are numbered. It uses Layer 1 (element semantics) to interpret
//! paragraphs as screenplay elements.
//!
//! ## Architecture
//!
//! Layer 2 is stateless where it can be - transitions and numbering are
//! pure functions over the element list. Revision passes carry the one
//! piece of state that must persist: the active color.
//!
//! ## Modules
//!
//! - `transitions`: Element-type flow on Enter/Tab
//! - `revisions`: Revision-pass marking and page banners
//! - `scenes`: Scene number allocation and interpolation

pub mod revisions;
pub mod scenes;
pub mod transitions;

// Re-exports for convenience
pub use revisions::{margin_marks, MarginMark, PageBanner, RevisionTracker};
pub use scenes::{allocate_scene_numbers, interpolate, AllocationResult, InterpolatedLabel};
pub use transitions::{apply_formatting, cycle_type, CommitAction, TransitionEngine};

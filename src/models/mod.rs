//! Data models for the screenplay editor
//!
//! Element types and their formatting styles, the document structure,
//! editor state, and scene number labels.

pub mod core;
pub mod editor_state;
pub mod elements;
pub mod scene_number;

// Re-export commonly used types
pub use core::{CharRange, CopyPayload, DocumentMetadata, ScriptDocument, ScriptElement};
pub use editor_state::{EditorState, Pos, Selection};
pub use elements::{Alignment, ElementStyle, ElementType, RevisionColor};
pub use scene_number::SceneNumber;

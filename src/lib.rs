//! Screenplay Editor WASM Module
//!
//! Core of a screenplay editor: element-typed paragraphs with fixed
//! Courier-grid formatting, an Enter/Tab transition engine, revision-color
//! tracking, locked scene numbering and orphan-aware pagination. The host
//! renders; this module owns the document and everything derived from it.

pub mod models;
pub mod parse;
pub mod structure;
pub mod layout;
pub mod undo;
pub mod editor;
pub mod api;

// Re-export commonly used types
pub use models::core::*;
pub use models::editor_state::*;
pub use models::elements::*;
pub use editor::{SceneOffset, ScriptEditor, ScriptError};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Screenplay Editor WASM module initialized");
}

//! WASM API for the screenplay editor
//!
//! JavaScript-facing surface over [`ScriptEditor`](crate::editor::ScriptEditor).
//! The module owns the canonical document; the host sends editing intents and
//! whole-paragraph edits, and reads derived views back. One document per
//! module instance; multi-document hosts instantiate the module per script.

use std::sync::Mutex;

use lazy_static::lazy_static;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, script_error, serialize};
use crate::editor::ScriptEditor;
use crate::models::core::{CopyPayload, ScriptElement};
use crate::models::editor_state::Pos;
use crate::models::elements::{ElementType, RevisionColor};
use crate::{wasm_info, wasm_warn};

// WASM-owned editor storage (canonical source of truth)
lazy_static! {
    static ref EDITOR: Mutex<Option<ScriptEditor>> = Mutex::new(None);
}

// ============================================================================
// Result structures for edit operations
// ============================================================================

/// What the host needs after any editing intent: the paragraph type the
/// cursor landed in, where the cursor is, and the current page count.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub struct EditOutcome {
    pub kind: ElementType,
    pub cursor_paragraph: usize,
    pub cursor_offset: usize,
    pub page_count: usize,
}

fn edit_outcome(editor: &mut ScriptEditor, kind: ElementType) -> EditOutcome {
    let cursor = editor.cursor();
    EditOutcome {
        kind,
        cursor_paragraph: cursor.paragraph,
        cursor_offset: cursor.offset,
        page_count: editor.page_count(),
    }
}

// ============================================================================
// Document lifecycle
// ============================================================================

/// Create a fresh single-paragraph document, replacing any loaded one
#[wasm_bindgen(js_name = newDocument)]
pub fn new_document() {
    wasm_info!("newDocument called");
    let mut guard = EDITOR.lock().unwrap();
    *guard = Some(ScriptEditor::new());
    wasm_info!("newDocument completed successfully");
}

/// Load a document from a JavaScript array of elements and paginate it
#[wasm_bindgen(js_name = loadDocument)]
pub fn load_document(elements_js: JsValue) -> Result<(), JsValue> {
    wasm_info!("loadDocument called");

    let elements: Vec<ScriptElement> =
        deserialize(elements_js, "Element deserialization error")?;
    wasm_info!("  Parsed {} elements", elements.len());

    let mut guard = EDITOR.lock().unwrap();
    let editor = guard.get_or_insert_with(ScriptEditor::new);
    editor.load_document(elements);

    wasm_info!("loadDocument completed successfully");
    Ok(())
}

/// Authoritative snapshot of every element, for persistence
#[wasm_bindgen(js_name = extractElements)]
pub fn extract_elements() -> Result<js_sys::Array, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let result = js_sys::Array::new();
    for element in editor.extract_elements() {
        let element_js = serialize(&element, "Element serialization error")?;
        result.push(&element_js);
    }
    Ok(result)
}

// ============================================================================
// Editing intents
// ============================================================================

/// Replace one paragraph's text after a host-side keystroke or composition
#[wasm_bindgen(js_name = applyEdit)]
pub fn apply_edit(
    paragraph_index: usize,
    new_text: &str,
    cursor_position: usize,
) -> Result<JsValue, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let kind = editor
        .apply_edit(paragraph_index, new_text, cursor_position)
        .map_err(script_error)?;
    let outcome = edit_outcome(editor, kind);
    serialize(&outcome, "EditOutcome serialization error")
}

/// Reclassify the current paragraph (or selection) to an explicit type
#[wasm_bindgen(js_name = setElementType)]
pub fn set_element_type(kind: u8) -> Result<JsValue, JsValue> {
    wasm_info!("setElementType called: kind={}", kind);
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    // out-of-range discriminants fall back to Action
    let kind = ElementType::from_value(kind);
    editor.set_element_type(kind).map_err(script_error)?;
    let outcome = edit_outcome(editor, kind);
    serialize(&outcome, "EditOutcome serialization error")
}

/// The type the next typed paragraph would take
#[wasm_bindgen(js_name = currentElementType)]
pub fn current_element_type() -> Result<u8, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.current_element_type() as u8)
}

/// Enter pressed: split the paragraph or retype an empty one
#[wasm_bindgen(js_name = handleEnter)]
pub fn handle_enter() -> Result<JsValue, JsValue> {
    wasm_info!("handleEnter called");
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let kind = editor.handle_enter().map_err(script_error)?;
    wasm_info!("  Enter resolved to {}", kind.name());
    let outcome = edit_outcome(editor, kind);
    serialize(&outcome, "EditOutcome serialization error")
}

/// Tab or Shift-Tab pressed: cycle the targeted paragraph types
#[wasm_bindgen(js_name = handleTab)]
pub fn handle_tab(shift_held: bool) -> Result<JsValue, JsValue> {
    wasm_info!("handleTab called: shift_held={}", shift_held);
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let kind = editor.handle_tab(shift_held).map_err(script_error)?;
    let outcome = edit_outcome(editor, kind);
    serialize(&outcome, "EditOutcome serialization error")
}

/// Backspace pressed at the cursor
#[wasm_bindgen(js_name = handleDeleteBackward)]
pub fn handle_delete_backward() -> Result<JsValue, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let kind = editor.handle_delete_backward().map_err(script_error)?;
    let outcome = edit_outcome(editor, kind);
    serialize(&outcome, "EditOutcome serialization error")
}

// ============================================================================
// Cursor and selection
// ============================================================================

#[wasm_bindgen(js_name = setCursor)]
pub fn set_cursor(paragraph: usize, offset: usize) -> Result<(), JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    editor.set_cursor(Pos::new(paragraph, offset));
    Ok(())
}

#[wasm_bindgen(js_name = setSelection)]
pub fn set_selection(
    anchor_paragraph: usize,
    anchor_offset: usize,
    focus_paragraph: usize,
    focus_offset: usize,
) -> Result<(), JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    editor.set_selection(
        Pos::new(anchor_paragraph, anchor_offset),
        Pos::new(focus_paragraph, focus_offset),
    );
    Ok(())
}

#[wasm_bindgen(js_name = clearSelection)]
pub fn clear_selection() -> Result<(), JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    editor.clear_selection();
    Ok(())
}

// ============================================================================
// Revision tracking and locking
// ============================================================================

/// Begin a revision pass by color name ("blue", "pink", ...). Passing
/// nothing, "white", or an unknown name ends the active pass.
#[wasm_bindgen(js_name = setRevisionColor)]
pub fn set_revision_color(color: Option<String>) -> Result<(), JsValue> {
    wasm_info!("setRevisionColor called: color={:?}", color);
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let parsed = color.as_deref().map(RevisionColor::parse_name);
    if let (Some(name), Some(RevisionColor::White)) = (color.as_deref(), parsed) {
        if !name.eq_ignore_ascii_case("white") {
            wasm_warn!("Unknown revision color '{}', ending active pass", name);
        }
    }
    editor.set_revision_color(parsed);
    Ok(())
}

/// Lock the document: assign scene numbers and freeze them
#[wasm_bindgen(js_name = lockDocument)]
pub fn lock_document() -> Result<(), JsValue> {
    wasm_info!("lockDocument called");
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    editor.lock_document();
    wasm_info!("lockDocument completed successfully");
    Ok(())
}

#[wasm_bindgen(js_name = isLocked)]
pub fn is_locked() -> Result<bool, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.is_locked())
}

// ============================================================================
// Derived views
// ============================================================================

#[wasm_bindgen(js_name = pageCount)]
pub fn page_count() -> Result<usize, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.page_count())
}

/// Full pagination result: page slices, per-paragraph placements, cap flag
#[wasm_bindgen(js_name = pageMap)]
pub fn page_map() -> Result<JsValue, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    let map = editor.page_map().clone();
    serialize(&map, "PageMap serialization error")
}

/// Scene headings with their page and line placements, for navigation
#[wasm_bindgen(js_name = sceneHeadingOffsets)]
pub fn scene_heading_offsets() -> Result<JsValue, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    let offsets = editor.scene_heading_offsets();
    serialize(&offsets, "SceneOffset serialization error")
}

/// Header banner text for a page, e.g. "BLUE REVISION 03/12/24"
#[wasm_bindgen(js_name = pageBanner)]
pub fn page_banner(page: usize) -> Result<Option<String>, JsValue> {
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.page_banner(page).map(|banner| banner.label()))
}

/// Ordered (paragraph, color) pairs for the revised-paragraph margin stars
#[wasm_bindgen(js_name = marginMarks)]
pub fn margin_marks() -> Result<JsValue, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    serialize(&editor.margin_marks(), "MarginMark serialization error")
}

/// Character-offset range of every paragraph in the concatenated text
#[wasm_bindgen(js_name = elementRanges)]
pub fn element_ranges() -> Result<JsValue, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    serialize(&editor.element_ranges().to_vec(), "CharRange serialization error")
}

// ============================================================================
// Clipboard
// ============================================================================

/// Copy paragraphs [start, end) as a lossless payload plus plain text
#[wasm_bindgen(js_name = copyRange)]
pub fn copy_range(start: usize, end: usize) -> Result<JsValue, JsValue> {
    wasm_info!("copyRange called: {}..{}", start, end);
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let payload = editor.copy_range(start, end).map_err(script_error)?;
    serialize(&payload, "CopyPayload serialization error")
}

/// Copy the paragraphs the active selection touches
#[wasm_bindgen(js_name = copySelection)]
pub fn copy_selection() -> Result<JsValue, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let payload = editor.copy_selection().map_err(script_error)?;
    serialize(&payload, "CopyPayload serialization error")
}

/// Insert a copied payload before paragraph `at`; returns the paste length
#[wasm_bindgen(js_name = pasteElements)]
pub fn paste_elements(at: usize, payload_js: JsValue) -> Result<usize, JsValue> {
    wasm_info!("pasteElements called: at={}", at);
    let payload: CopyPayload = deserialize(payload_js, "CopyPayload deserialization error")?;

    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let count = editor.paste_elements(at, &payload).map_err(script_error)?;
    wasm_info!("  Pasted {} elements", count);
    Ok(count)
}

/// Classify external plain text into typed paragraphs and insert them
#[wasm_bindgen(js_name = pastePlainText)]
pub fn paste_plain_text(at: usize, text: &str) -> Result<usize, JsValue> {
    wasm_info!("pastePlainText called: at={}, {} chars", at, text.len());
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    let count = editor.paste_plain_text(at, text).map_err(script_error)?;
    wasm_info!("  Created {} paragraphs", count);
    Ok(count)
}

// ============================================================================
// History
// ============================================================================

/// Undo the newest change; returns the restored elements snapshot
#[wasm_bindgen(js_name = undo)]
pub fn undo() -> Result<JsValue, JsValue> {
    wasm_info!("undo called");
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    editor.undo().map_err(script_error)?;
    serialize(&editor.extract_elements(), "Element serialization error")
}

/// Reapply the newest undone change; returns the restored elements snapshot
#[wasm_bindgen(js_name = redo)]
pub fn redo() -> Result<JsValue, JsValue> {
    wasm_info!("redo called");
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;

    editor.redo().map_err(script_error)?;
    serialize(&editor.extract_elements(), "Element serialization error")
}

#[wasm_bindgen(js_name = canUndo)]
pub fn can_undo() -> Result<bool, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.can_undo())
}

#[wasm_bindgen(js_name = canRedo)]
pub fn can_redo() -> Result<bool, JsValue> {
    let guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_ref()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    Ok(editor.can_redo())
}

// ============================================================================
// Configuration
// ============================================================================

/// Defer repagination while the host streams a burst of edits. Derived
/// reads still flush first, so they never observe a stale map.
#[wasm_bindgen(js_name = setDeferredPagination)]
pub fn set_deferred_pagination(deferred: bool) -> Result<(), JsValue> {
    wasm_info!("setDeferredPagination called: deferred={}", deferred);
    let mut guard = EDITOR.lock().unwrap();
    let editor = guard
        .as_mut()
        .ok_or_else(|| JsValue::from_str("No document loaded"))?;
    editor.set_deferred_pagination(deferred);
    Ok(())
}

//! WASM build test
//!
//! Drives the exported JS surface in a browser the way a host would: build
//! documents as `JsValue`s, push editing intents, read derived views back.

#![cfg(target_arch = "wasm32")]

use screenplay_wasm::api::*;
use screenplay_wasm::models::core::ScriptElement;
use screenplay_wasm::models::elements::ElementType;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn scenario_js() -> JsValue {
    let elements = vec![
        ScriptElement::new(ElementType::SceneHeading, "INT. HOUSE - DAY"),
        ScriptElement::new(ElementType::Action, "He enters."),
        ScriptElement::new(ElementType::Character, "JOHN"),
        ScriptElement::new(ElementType::Dialogue, "Hello."),
    ];
    serde_wasm_bindgen::to_value(&elements).unwrap()
}

#[wasm_bindgen_test]
fn test_new_document_is_one_empty_page() {
    new_document();
    assert_eq!(page_count().unwrap(), 1);
    assert_eq!(
        current_element_type().unwrap(),
        ElementType::Action as u8
    );
}

#[wasm_bindgen_test]
fn test_load_and_extract_round_trip() {
    load_document(scenario_js()).unwrap();

    let extracted = extract_elements().unwrap();
    assert_eq!(extracted.length(), 4);

    let first: ScriptElement = serde_wasm_bindgen::from_value(extracted.get(0)).unwrap();
    assert_eq!(first.kind, ElementType::SceneHeading);
    assert_eq!(first.text, "INT. HOUSE - DAY");
}

#[wasm_bindgen_test]
fn test_enter_intent_advances_element_type() {
    load_document(scenario_js()).unwrap();
    set_cursor(1, 10).unwrap();

    handle_enter().unwrap();
    assert_eq!(
        current_element_type().unwrap(),
        ElementType::Character as u8
    );
    assert_eq!(extract_elements().unwrap().length(), 5);
}

#[wasm_bindgen_test]
fn test_lock_assigns_scene_numbers() {
    load_document(scenario_js()).unwrap();
    lock_document().unwrap();
    assert!(is_locked().unwrap());

    let first: ScriptElement =
        serde_wasm_bindgen::from_value(extract_elements().unwrap().get(0)).unwrap();
    assert_eq!(first.scene_number.as_deref(), Some("1"));

    // no revision pass ran, so page one has no banner
    assert!(page_banner(0).unwrap().is_none());
}

#[wasm_bindgen_test]
fn test_unknown_revision_color_is_recoverable() {
    load_document(scenario_js()).unwrap();
    set_revision_color(Some("chartreuse".to_string())).unwrap();

    // the unknown name ended any pass; edits stay unmarked
    apply_edit(1, "He enters slowly.", 17).unwrap();
    let edited: ScriptElement =
        serde_wasm_bindgen::from_value(extract_elements().unwrap().get(1)).unwrap();
    assert!(edited.revision_color.is_none());
}

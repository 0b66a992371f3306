// Production flow: locked scene numbering and colored revision passes,
// driven end to end through the editor.

use screenplay_wasm::editor::ScriptEditor;
use screenplay_wasm::models::core::ScriptElement;
use screenplay_wasm::models::editor_state::Pos;
use screenplay_wasm::models::elements::{ElementType, RevisionColor};

fn el(kind: ElementType, text: &str) -> ScriptElement {
    ScriptElement::new(kind, text)
}

/// Three-scene script; locking numbers the headings 1, 2, 3
fn production_script() -> Vec<ScriptElement> {
    vec![
        el(ElementType::SceneHeading, "INT. HOUSE - DAY"),
        el(ElementType::Action, "He enters."),
        el(ElementType::Character, "JOHN"),
        el(ElementType::Dialogue, "Hello."),
        el(ElementType::SceneHeading, "EXT. YARD - DAY"),
        el(ElementType::Action, "Rain."),
        el(ElementType::SceneHeading, "INT. CELLAR - NIGHT"),
        el(ElementType::Action, "Darkness."),
    ]
}

fn locked_editor() -> ScriptEditor {
    let mut editor = ScriptEditor::new();
    editor.load_document(production_script());
    editor.lock_document();
    editor
}

#[test]
fn test_blue_pass_marks_insertions_and_banners() {
    let mut editor = locked_editor();
    editor.set_revision_color(Some(RevisionColor::Blue));

    // growing the dialogue is an insertion; the pass stamps it
    editor.apply_edit(3, "Hello. You're late.", 19).unwrap();

    let marked = &editor.extract_elements()[3];
    assert_eq!(marked.revision_color, Some(RevisionColor::Blue));
    assert_eq!(marked.revision_id, Some(1));
    assert_eq!(marked.original_text.as_deref(), Some("Hello."));

    let marks = editor.margin_marks();
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].paragraph, 3);

    let banner = editor.page_banner(0).expect("page 0 holds the revised line");
    assert_eq!(banner.color, RevisionColor::Blue);
    assert!(banner.label().starts_with("BLUE REVISION "));

    // pure deletions never mark, in or out of a pass
    editor.apply_edit(1, "He enters", 9).unwrap();
    assert!(editor.extract_elements()[1].revision_color.is_none());

    // ending the pass stops marking but keeps existing marks
    editor.set_revision_color(None);
    editor.apply_edit(5, "Rain hammers down.", 18).unwrap();
    assert!(editor.extract_elements()[5].revision_color.is_none());
    assert_eq!(
        editor.extract_elements()[3].revision_color,
        Some(RevisionColor::Blue)
    );
}

#[test]
fn test_later_lower_color_never_downgrades() {
    let mut editor = locked_editor();

    editor.set_revision_color(Some(RevisionColor::Pink));
    editor.apply_edit(3, "Hello there.", 12).unwrap();
    assert_eq!(
        editor.extract_elements()[3].revision_color,
        Some(RevisionColor::Pink)
    );

    // a later Blue pass touches the Pink paragraph and a clean one
    editor.set_revision_color(Some(RevisionColor::Blue));
    editor.apply_edit(3, "Hello there, John.", 18).unwrap();
    editor.apply_edit(7, "Darkness, then a match flares.", 29).unwrap();

    let elements = editor.extract_elements();
    // Pink outranks Blue, so the earlier mark stands untouched
    assert_eq!(elements[3].revision_color, Some(RevisionColor::Pink));
    assert_eq!(elements[3].revision_id, Some(1));
    assert_eq!(elements[3].original_text.as_deref(), Some("Hello."));
    // the clean paragraph takes the active color
    assert_eq!(elements[7].revision_color, Some(RevisionColor::Blue));
    assert_eq!(elements[7].revision_id, Some(2));

    let colors: Vec<RevisionColor> = editor.margin_marks().iter().map(|m| m.color).collect();
    assert_eq!(colors, vec![RevisionColor::Pink, RevisionColor::Blue]);
}

#[test]
fn test_paragraph_created_during_pass_has_no_baseline() {
    let mut editor = locked_editor();
    editor.set_revision_color(Some(RevisionColor::Blue));

    // split at the end of the dialogue; the new cue is born in the pass
    editor.set_cursor(Pos::new(3, 6));
    assert_eq!(editor.handle_enter().unwrap(), ElementType::Character);
    editor.apply_edit(4, "SARAH", 5).unwrap();

    let created = &editor.extract_elements()[4];
    assert_eq!(created.kind, ElementType::Character);
    assert!(created.is_new_in_revision);
    assert_eq!(created.revision_color, Some(RevisionColor::Blue));
    // a paragraph born in the pass has no earlier text to snapshot
    assert!(created.original_text.is_none());
}

#[test]
fn test_lock_numbers_then_interpolates_new_scenes() {
    let mut editor = locked_editor();
    let numbered: Vec<Option<String>> = editor
        .extract_elements()
        .iter()
        .map(|e| e.scene_number.clone())
        .collect();
    assert_eq!(numbered[0].as_deref(), Some("1"));
    assert_eq!(numbered[4].as_deref(), Some("2"));
    assert_eq!(numbered[6].as_deref(), Some("3"));

    // Shift-Tab turns the action between scenes 1 and 2 into a heading;
    // the gap takes a letter suffix
    editor.set_cursor(Pos::start_of(1));
    editor.handle_tab(true).unwrap();

    let elements = editor.extract_elements();
    assert_eq!(elements[1].kind, ElementType::SceneHeading);
    assert_eq!(elements[1].text, "HE ENTERS.");
    assert_eq!(elements[1].scene_number.as_deref(), Some("1A"));
    // existing labels never move
    assert_eq!(elements[4].scene_number.as_deref(), Some("2"));

    // the retype, reformat, and number assignment undo as one step
    editor.undo().unwrap();
    let elements = editor.extract_elements();
    assert_eq!(elements[1].kind, ElementType::Action);
    assert_eq!(elements[1].text, "He enters.");
    assert_eq!(elements[1].scene_number, None);

    editor.redo().unwrap();
    assert_eq!(
        editor.extract_elements()[1].scene_number.as_deref(),
        Some("1A")
    );
}

#[test]
fn test_omitted_scene_keeps_number_and_anchors_interpolation() {
    let mut editor = locked_editor();

    // empty scene 2's heading, then backspace at its start
    editor.apply_edit(4, "", 0).unwrap();
    editor.set_cursor(Pos::start_of(4));
    editor.handle_delete_backward().unwrap();

    let omitted = &editor.extract_elements()[4];
    assert!(omitted.is_omitted);
    assert_eq!(omitted.scene_number.as_deref(), Some("2"));
    assert_eq!(omitted.display_text(), "OMITTED");
    // the placeholder still occupies the page
    let map = editor.page_map().clone();
    assert_eq!(map.placements.len(), 8);

    // an omitted scene still anchors numbering on both sides
    editor.set_cursor(Pos::start_of(5));
    editor.handle_tab(true).unwrap();
    assert_eq!(
        editor.extract_elements()[5].scene_number.as_deref(),
        Some("2A")
    );
}

#[test]
fn test_production_state_survives_save_and_reload() {
    let mut editor = locked_editor();
    editor.set_revision_color(Some(RevisionColor::Blue));
    editor.apply_edit(3, "Hello. You're late.", 19).unwrap();

    let saved = serde_json::to_string(&editor.extract_elements()).unwrap();
    let restored: Vec<ScriptElement> = serde_json::from_str(&saved).unwrap();

    let mut reloaded = ScriptEditor::new();
    reloaded.load_document(restored);
    assert_eq!(reloaded.extract_elements(), editor.extract_elements());

    // the lock flag lives on the document, not the elements; relocking
    // finds every heading numbered and changes nothing
    assert!(!reloaded.is_locked());
    reloaded.lock_document();
    assert_eq!(reloaded.extract_elements(), editor.extract_elements());

    // pass ids resume above the highest loaded id
    reloaded.set_revision_color(Some(RevisionColor::Pink));
    reloaded.apply_edit(5, "Rain hammers down.", 18).unwrap();
    assert_eq!(reloaded.extract_elements()[5].revision_id, Some(2));
}

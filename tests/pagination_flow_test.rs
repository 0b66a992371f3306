// Pagination through the editor: page capacity on long scripts, the
// incremental repagination paths, and the derived navigation views.

use screenplay_wasm::editor::ScriptEditor;
use screenplay_wasm::layout::{measure_element, PageMetrics, PageSlice};
use screenplay_wasm::models::core::ScriptElement;
use screenplay_wasm::models::editor_state::Pos;
use screenplay_wasm::models::elements::{ElementType, RevisionColor};

/// Helper to build `scenes` copies of a heading/action/cue/dialogue block
fn long_script(scenes: usize) -> Vec<ScriptElement> {
    let mut elements = Vec::new();
    for i in 0..scenes {
        elements.push(ScriptElement::new(
            ElementType::SceneHeading,
            format!("INT. ROOM {} - DAY", i + 1),
        ));
        elements.push(ScriptElement::new(
            ElementType::Action,
            "The room is bare except for a table and two chairs bolted to the floor.",
        ));
        elements.push(ScriptElement::new(ElementType::Character, "DANA"));
        elements.push(ScriptElement::new(
            ElementType::Dialogue,
            "Sit down. This is going to take a while.",
        ));
    }
    elements
}

/// Independent recount of the lines a page consumes, lead-in gaps included
fn used_lines(elements: &[ScriptElement], slice: &PageSlice) -> usize {
    let mut total = 0;
    for idx in slice.paragraph_range() {
        let m = measure_element(elements[idx].kind, elements[idx].display_text());
        let from = if idx == slice.start.paragraph {
            slice.start.line
        } else {
            0
        };
        let to = if idx == slice.end.paragraph && slice.end.line > 0 {
            slice.end.line
        } else {
            m.lines
        };
        if from == 0 && idx != slice.start.paragraph {
            total += m.lead_in;
        }
        total += to - from;
    }
    total
}

#[test]
fn test_long_script_fills_pages_within_capacity() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(40));
    let elements = editor.extract_elements();

    let map = editor.page_map().clone();
    assert!(map.page_count() >= 5, "40 scenes span pages, got {}", map.page_count());
    assert!(!map.capped);
    assert_eq!(map.placements.len(), elements.len());

    // pages tile the document with no gaps and never overflow
    for w in map.slices.windows(2) {
        assert_eq!(w[0].end, w[1].start);
    }
    for slice in &map.slices {
        assert!(used_lines(&elements, slice) <= 54);
    }
}

#[test]
fn test_text_edit_repaginates_like_a_fresh_pass() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(40));
    let pages_before = editor.page_count();

    // grow a paragraph deep in the script so wrapping changes
    let long_line = "She reads the file twice, sets it down, and reads it a third time, \
line by line, as if the words might rearrange themselves between passes.";
    editor.apply_edit(61, long_line, 10).expect("paragraph 61 exists");

    let incremental = editor.page_map().clone();

    let mut fresh = ScriptEditor::new();
    fresh.load_document(editor.extract_elements());
    assert_eq!(&incremental, fresh.page_map());
    assert!(incremental.page_count() >= pages_before);
}

#[test]
fn test_split_and_merge_repaginate_like_a_fresh_pass() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(30));

    // split an action paragraph on a middle page
    editor.set_cursor(Pos::new(45, 12));
    editor.handle_enter().expect("paragraph 45 exists");
    {
        let mut fresh = ScriptEditor::new();
        fresh.load_document(editor.extract_elements());
        let map = editor.page_map().clone();
        assert_eq!(&map, fresh.page_map());
        assert_eq!(map.placements.len(), 30 * 4 + 1);
    }

    // merge it back and compare again
    editor.set_cursor(Pos::start_of(46));
    editor.handle_delete_backward().expect("merge into paragraph 45");
    let mut fresh = ScriptEditor::new();
    fresh.load_document(editor.extract_elements());
    assert_eq!(editor.page_map().clone(), *fresh.page_map());
}

#[test]
fn test_scene_offsets_walk_the_script_in_order() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(24));
    editor.lock_document();

    let offsets = editor.scene_heading_offsets();
    assert_eq!(offsets.len(), 24);
    assert_eq!(offsets[0].scene_number.as_deref(), Some("1"));
    assert_eq!(offsets[23].scene_number.as_deref(), Some("24"));

    for w in offsets.windows(2) {
        assert!(w[0].paragraph < w[1].paragraph);
        assert!(
            (w[0].page, w[0].y_line) < (w[1].page, w[1].y_line),
            "headings must appear in page order"
        );
    }
    let last_page = editor.page_count() - 1;
    assert!(offsets[23].page <= last_page);
}

#[test]
fn test_page_banner_marks_only_revised_pages() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(40));
    editor.set_revision_color(Some(RevisionColor::Blue));

    // an insertion on a deep page marks that page's banner
    let target = 101;
    let grown = format!("{} Nobody speaks.", editor.extract_elements()[target].text);
    editor
        .apply_edit(target, &grown, grown.chars().count())
        .expect("paragraph 101 exists");
    let page = editor
        .page_map()
        .page_of_paragraph(target)
        .expect("paragraph is placed");
    assert!(page > 0);

    let banner = editor.page_banner(page).expect("page holds a revised line");
    assert_eq!(banner.color, RevisionColor::Blue);
    assert!(banner.label().starts_with("BLUE REVISION "));

    assert!(editor.page_banner(0).is_none());
    assert_eq!(editor.margin_marks().len(), 1);
    assert_eq!(editor.margin_marks()[0].paragraph, target);
}

#[test]
fn test_custom_metrics_thread_through() {
    let mut editor = ScriptEditor::with_metrics(PageMetrics {
        lines_per_page: 20,
        max_pages: 500,
        break_after_title_page: true,
    });
    editor.load_document(long_script(10));

    assert_eq!(editor.metrics().lines_per_page, 20);
    let elements = editor.extract_elements();
    let map = editor.page_map().clone();
    for slice in &map.slices {
        assert!(used_lines(&elements, slice) <= 20);
    }

    let mut default_editor = ScriptEditor::new();
    default_editor.load_document(elements);
    assert!(map.page_count() > default_editor.page_count());
}

#[test]
fn test_deferred_pagination_batches_edits() {
    let mut editor = ScriptEditor::new();
    editor.load_document(long_script(20));
    editor.set_deferred_pagination(true);

    for i in 0..10 {
        let target = i * 4 + 1;
        editor
            .apply_edit(target, "Replaced while pagination sleeps.", 5)
            .expect("action paragraph exists");
    }
    // clearing the flag flushes once over the batched edits
    editor.set_deferred_pagination(false);

    let mut fresh = ScriptEditor::new();
    fresh.load_document(editor.extract_elements());
    assert_eq!(editor.page_map().clone(), *fresh.page_map());
}

//! Script editor orchestration
//!
//! `ScriptEditor` owns one document plus everything derived from it: the
//! cursor-local transition state, the active revision pass, the page map,
//! and undo history. Hosts drive it through named intents (`handle_enter`,
//! `handle_tab`, `handle_delete_backward`) and whole-paragraph edits;
//! keystroke-to-intent translation is the host's job.

use std::collections::HashSet;

use thiserror::Error;

use crate::layout::paginator::{PageMap, PageMetrics, Paginator};
use crate::models::core::{CharRange, CopyPayload, ScriptDocument, ScriptElement};
use crate::models::editor_state::{EditorState, Pos, Selection};
use crate::models::elements::{ElementType, RevisionColor};
use crate::parse::classify::classify_text;
use crate::structure::revisions::{self, MarginMark, PageBanner, RevisionTracker};
use crate::structure::scenes::allocate_scene_numbers;
use crate::structure::transitions::{apply_formatting, cycle_type, CommitAction, TransitionEngine};
use crate::undo::{Command, RevisionSnapshot, UndoStack};

/// Recoverable failures of the editing API. Malformed input never panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("paragraph index {index} out of bounds (document has {len})")]
    ParagraphOutOfBounds { index: usize, len: usize },

    #[error("operation requires a selection and none is active")]
    NoSelection,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("paste payload is empty")]
    EmptyPayload,
}

/// Where a scene heading sits on the page grid, for navigation panels
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneOffset {
    pub paragraph: usize,
    pub scene_number: Option<String>,
    pub page: usize,
    pub y_line: usize,
}

pub struct ScriptEditor {
    state: EditorState,
    transitions: TransitionEngine,
    revisions: RevisionTracker,
    paginator: Paginator,
    undo: UndoStack,
    page_map: PageMap,
    /// Lowest paragraph whose height may have changed since the last flush
    first_dirty: Option<usize>,
    /// Paragraphs were inserted or removed; incremental restart is unsafe
    structure_dirty: bool,
    deferred: bool,
    next_revision_id: i32,
}

impl ScriptEditor {
    pub fn new() -> Self {
        Self::with_metrics(PageMetrics::default())
    }

    /// Page geometry is threaded in here, never read from globals
    pub fn with_metrics(metrics: PageMetrics) -> Self {
        let mut editor = Self {
            state: EditorState::new(ScriptDocument::new()),
            transitions: TransitionEngine::new(),
            revisions: RevisionTracker::new(),
            paginator: Paginator::new(metrics),
            undo: UndoStack::default(),
            page_map: PageMap::empty(),
            first_dirty: None,
            structure_dirty: true,
            deferred: false,
            next_revision_id: 1,
        };
        editor.flush_pagination();
        editor
    }

    /// Replace the document wholesale and paginate it. The revision pass,
    /// if one is active, stays active; pass ids resume above the highest
    /// id already stamped in the loaded elements.
    pub fn load_document(&mut self, elements: Vec<ScriptElement>) {
        let document = ScriptDocument::from_elements(elements);
        self.next_revision_id = document
            .elements
            .iter()
            .filter_map(|el| el.revision_id)
            .max()
            .unwrap_or(0)
            + 1;
        let kind = document
            .elements
            .first()
            .map(|el| el.kind)
            .unwrap_or(ElementType::Action);

        self.state = EditorState::new(document);
        self.transitions.sync_to(kind);
        self.undo.clear();
        self.first_dirty = None;
        self.structure_dirty = true;
        if !self.deferred {
            self.flush_pagination();
        }
        log::debug!("loaded document with {} elements", self.state.document.len());
    }

    /// Replace one paragraph's text after the host applied a keystroke (or
    /// an IME composition) and report the paragraph's current type.
    ///
    /// The all-caps transform of the paragraph's type is applied here, so
    /// typed text in a cue or slug line is stored uppercase. Whether the
    /// change was an insertion (text grew) feeds the revision tracker.
    pub fn apply_edit(
        &mut self,
        paragraph_index: usize,
        new_text: &str,
        cursor_offset: usize,
    ) -> Result<ElementType, ScriptError> {
        let len = self.state.document.len();
        let el = self
            .state
            .document
            .element_mut(paragraph_index)
            .ok_or(ScriptError::ParagraphOutOfBounds {
                index: paragraph_index,
                len,
            })?;

        let kind = el.kind;
        let formatted = apply_formatting(kind, new_text);

        if formatted != el.text {
            let before_text = el.text.clone();
            let was_insertion = formatted.chars().count() > before_text.chars().count();
            let revision_before = RevisionSnapshot::capture(el);

            el.text = formatted.clone();
            let marked = self.revisions.mark_edit(el, was_insertion, &before_text);

            let text_command = Command::ReplaceText {
                paragraph: paragraph_index,
                before: before_text,
                after: formatted,
            };
            let command = if marked {
                Command::Batch {
                    commands: vec![
                        text_command,
                        Command::MarkRevision {
                            paragraph: paragraph_index,
                            before: revision_before,
                            after: RevisionSnapshot::capture(el),
                        },
                    ],
                }
            } else {
                text_command
            };
            self.undo
                .push(command, Pos::new(paragraph_index, cursor_offset));

            self.state.document.rebuild_ranges();
            self.state.document.metadata.touch();
            self.mark_dirty(paragraph_index);
        }

        let end = self
            .state
            .document
            .element(paragraph_index)
            .map(|e| e.text.chars().count())
            .unwrap_or(0);
        self.state
            .set_cursor(Pos::new(paragraph_index, cursor_offset.min(end)));
        self.transitions.sync_to(kind);
        Ok(kind)
    }

    /// Reclassify the current paragraph, or every paragraph the selection
    /// touches, to `kind`, reapplying the full formatting. Idempotent.
    pub fn set_element_type(&mut self, kind: ElementType) -> Result<(), ScriptError> {
        self.undo.finalize_batch();
        let (first, last) = self.target_paragraphs();
        let len = self.state.document.len();
        if last >= len {
            return Err(ScriptError::ParagraphOutOfBounds { index: last, len });
        }

        let mut commands = Vec::new();
        for idx in first..=last {
            if let Some(el) = self.state.document.element_mut(idx) {
                retype_element(el, idx, kind, &mut commands);
            }
        }
        commands.extend(self.assign_new_scene_numbers());
        self.record_structural(commands, first);
        self.transitions.set_current(kind);
        Ok(())
    }

    /// The Enter intent. A non-empty paragraph splits at the cursor and the
    /// tail takes the next-on-content type; an empty one reclassifies in
    /// place to next-on-empty, so repeated Enter cycles types without
    /// stacking blank paragraphs.
    pub fn handle_enter(&mut self) -> Result<ElementType, ScriptError> {
        self.undo.finalize_batch();
        let cursor = self.state.cursor();
        let idx = cursor.paragraph;
        let len = self.state.document.len();
        let el = self
            .state
            .document
            .element(idx)
            .ok_or(ScriptError::ParagraphOutOfBounds { index: idx, len })?
            .clone();

        self.transitions.sync_to(el.kind);
        match self.transitions.commit(el.text.is_empty()) {
            CommitAction::Retype { next } => {
                if el.kind != next {
                    let command = Command::SetKind {
                        paragraph: idx,
                        before: el.kind,
                        after: next,
                    };
                    command.execute(&mut self.state.document.elements)?;
                    let mut commands = vec![command];
                    commands.extend(self.assign_new_scene_numbers());
                    self.record_structural(commands, idx);
                }
                Ok(next)
            }
            CommitAction::Split { next } => {
                let split_at = el
                    .text
                    .char_indices()
                    .nth(cursor.offset)
                    .map(|(byte, _)| byte)
                    .unwrap_or(el.text.len());
                let (head_text, tail_text) = el.text.split_at(split_at);

                let mut head = el.clone();
                head.text = head_text.to_string();
                // the new type applies to subsequently typed text only;
                // carried-over tail text is not reformatted
                let mut tail = ScriptElement::new(next, tail_text);
                if self.revisions.is_marking() {
                    self.revisions.mark_new(&mut tail);
                }

                let splice = Command::Splice {
                    at: idx,
                    removed: vec![el],
                    inserted: vec![head, tail],
                };
                splice.execute(&mut self.state.document.elements)?;
                let mut commands = vec![splice];
                commands.extend(self.assign_new_scene_numbers());
                let command = match commands.len() {
                    1 => commands.remove(0),
                    _ => Command::Batch { commands },
                };
                self.undo.push(command, Pos::start_of(idx));
                self.undo.finalize_batch();

                self.state.document.rebuild_ranges();
                self.state.document.metadata.touch();
                self.state.set_cursor(Pos::start_of(idx + 1));
                self.mark_structure_dirty();
                Ok(next)
            }
        }
    }

    /// The Tab / Shift-Tab intent: cycle each targeted paragraph to the
    /// next (or previous) entry of its own ring and reapply formatting.
    pub fn handle_tab(&mut self, shift_held: bool) -> Result<ElementType, ScriptError> {
        self.undo.finalize_batch();
        let (first, last) = self.target_paragraphs();
        let len = self.state.document.len();
        if last >= len {
            return Err(ScriptError::ParagraphOutOfBounds { index: last, len });
        }

        let mut commands = Vec::new();
        for idx in first..=last {
            if let Some(el) = self.state.document.element_mut(idx) {
                let next = cycle_type(el.kind, shift_held);
                retype_element(el, idx, next, &mut commands);
            }
        }
        commands.extend(self.assign_new_scene_numbers());
        self.record_structural(commands, first);

        let current = self
            .state
            .document
            .element(self.state.cursor().paragraph)
            .map(|el| el.kind)
            .unwrap_or(ElementType::Action);
        self.transitions.set_current(current);
        Ok(current)
    }

    /// The deleteBackward intent. Inside a paragraph it deletes one
    /// character; at a paragraph start it merges into the previous
    /// paragraph and re-derives the current type from the merge target.
    ///
    /// Locked, numbered scene headings are never merged away: emptying one
    /// turns it into an OMITTED placeholder that keeps its number.
    pub fn handle_delete_backward(&mut self) -> Result<ElementType, ScriptError> {
        let cursor = self.state.cursor();
        let idx = cursor.paragraph;
        let len = self.state.document.len();
        let el = self
            .state
            .document
            .element(idx)
            .ok_or(ScriptError::ParagraphOutOfBounds { index: idx, len })?
            .clone();

        if cursor.offset > 0 {
            let mut chars: Vec<char> = el.text.chars().collect();
            let remove_at = cursor.offset.min(chars.len());
            if remove_at == 0 {
                return Ok(el.kind);
            }
            chars.remove(remove_at - 1);
            let new_text: String = chars.into_iter().collect();
            return self.apply_edit(idx, &new_text, remove_at - 1);
        }

        if idx == 0 {
            return Ok(el.kind);
        }

        if self.state.document.locked && el.is_scene_heading() && el.scene_number.is_some() {
            if el.text.is_empty() && !el.is_omitted {
                let mut omitted = el.clone();
                omitted.is_omitted = true;
                let command = Command::Splice {
                    at: idx,
                    removed: vec![el],
                    inserted: vec![omitted],
                };
                command.execute(&mut self.state.document.elements)?;
                self.undo.push(command, Pos::start_of(idx));
                self.undo.finalize_batch();
                self.state.document.metadata.touch();
                self.mark_dirty(idx);
                log::debug!("scene at paragraph {} omitted", idx);
            }
            return self.move_cursor_to_previous_end(idx);
        }

        let prev = self
            .state
            .document
            .element(idx - 1)
            .ok_or(ScriptError::ParagraphOutOfBounds { index: idx - 1, len })?
            .clone();
        let merge_offset = prev.text.chars().count();
        let mut merged = prev.clone();
        merged.text.push_str(&el.text);
        let merged_kind = merged.kind;

        let command = Command::Splice {
            at: idx - 1,
            removed: vec![prev, el],
            inserted: vec![merged],
        };
        command.execute(&mut self.state.document.elements)?;
        self.undo.finalize_batch();
        self.undo.push(command, Pos::new(idx - 1, merge_offset));
        self.undo.finalize_batch();

        self.state.document.rebuild_ranges();
        self.state.document.metadata.touch();
        self.state.set_cursor(Pos::new(idx - 1, merge_offset));
        self.mark_structure_dirty();

        // the cursor changed paragraphs through a deletion: trust the
        // stored kind, not prior transition state
        self.transitions.sync_to(merged_kind);
        Ok(merged_kind)
    }

    /// Begin a revision pass (`Some(color)`) or end it (`None` or White).
    /// Setting the already-active color is a no-op, not a new pass.
    pub fn set_revision_color(&mut self, color: Option<RevisionColor>) {
        let normalized = color.filter(|c| c.is_revision());
        if normalized == self.revisions.active_color() {
            return;
        }
        match normalized {
            Some(c) => {
                let id = self.next_revision_id;
                self.next_revision_id += 1;
                self.revisions.set_active(Some(c), id);
                log::info!("revision pass started: {:?} (id {})", c, id);
            }
            None => {
                self.revisions.set_active(None, 0);
                log::info!("revision pass ended");
            }
        }
    }

    /// Freeze scene numbering. The allocator runs once, on the transition
    /// into the locked state; numbered headings keep their labels forever.
    pub fn lock_document(&mut self) {
        if self.state.document.locked {
            return;
        }
        self.state.document.locked = true;
        let result = allocate_scene_numbers(&mut self.state.document);
        self.state.document.metadata.touch();
        log::info!(
            "document locked: {} scene numbers assigned ({} fallbacks)",
            result.assigned.len(),
            result.fallbacks
        );
    }

    pub fn is_locked(&self) -> bool {
        self.state.document.locked
    }

    /// Authoritative snapshot for persistence
    pub fn extract_elements(&self) -> Vec<ScriptElement> {
        self.state.document.elements.clone()
    }

    pub fn document(&self) -> &ScriptDocument {
        &self.state.document
    }

    // -- derived views ---------------------------------------------------
    // Reads flush any deferred pagination first, so results always match
    // the final text.

    pub fn page_count(&mut self) -> usize {
        self.flush_pagination();
        self.page_map.page_count()
    }

    pub fn page_map(&mut self) -> &PageMap {
        self.flush_pagination();
        &self.page_map
    }

    /// Scene headings joined with their page placements, in document order
    pub fn scene_heading_offsets(&mut self) -> Vec<SceneOffset> {
        self.flush_pagination();
        let map = &self.page_map;
        self.state
            .document
            .scene_headings()
            .filter_map(|(idx, el)| {
                map.placements.get(idx).map(|p| SceneOffset {
                    paragraph: idx,
                    scene_number: el.scene_number.clone(),
                    page: p.page,
                    y_line: p.y_line,
                })
            })
            .collect()
    }

    /// Highest-priority revision color on a page, dated, for the header
    /// banner. `None` for an untouched page.
    pub fn page_banner(&mut self, page: usize) -> Option<PageBanner> {
        self.flush_pagination();
        let range = self.page_map.paragraph_range(page);
        self.revisions.banner_for_range(&self.state.document, range)
    }

    /// Ordered (paragraph, color) pairs for margin stars
    pub fn margin_marks(&self) -> Vec<MarginMark> {
        revisions::margin_marks(&self.state.document)
    }

    /// Paragraph index -> character-offset ranges over the plain text
    pub fn element_ranges(&self) -> &[CharRange] {
        self.state.document.ranges()
    }

    // -- clipboard -------------------------------------------------------

    /// Copy paragraphs `[start, end)` losslessly, with a plain-text
    /// fallback for consumers that only understand text
    pub fn copy_range(&self, start: usize, end: usize) -> Result<CopyPayload, ScriptError> {
        let len = self.state.document.len();
        if end > len {
            return Err(ScriptError::ParagraphOutOfBounds { index: end, len });
        }
        if start >= end {
            return Err(ScriptError::EmptyPayload);
        }
        let elements = self.state.document.elements[start..end].to_vec();
        let text = elements
            .iter()
            .map(|el| el.display_text())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CopyPayload { text, elements })
    }

    /// Copy the paragraphs the active selection touches
    pub fn copy_selection(&self) -> Result<CopyPayload, ScriptError> {
        let (first, last) = match self.state.selection() {
            Some(sel) => sel.paragraph_span(),
            None => return Err(ScriptError::NoSelection),
        };
        self.copy_range(first, last + 1)
    }

    /// Insert a copied payload before paragraph `at`. Pasted elements get
    /// fresh ids; a scene number that already exists in this document is
    /// dropped, and in a locked document the heading is renumbered instead.
    pub fn paste_elements(&mut self, at: usize, payload: &CopyPayload) -> Result<usize, ScriptError> {
        if payload.is_empty() {
            return Err(ScriptError::EmptyPayload);
        }
        let incoming: Vec<ScriptElement> =
            payload.elements.iter().map(|el| el.with_new_id()).collect();
        self.insert_elements(at, incoming)
    }

    /// Classify plain text into typed paragraphs and insert them before
    /// paragraph `at`. Returns how many paragraphs were created.
    pub fn paste_plain_text(&mut self, at: usize, text: &str) -> Result<usize, ScriptError> {
        let typed = classify_text(text);
        if typed.is_empty() {
            return Err(ScriptError::EmptyPayload);
        }
        let incoming = typed
            .into_iter()
            .map(|(kind, text)| ScriptElement::new(kind, apply_formatting(kind, &text)))
            .collect();
        self.insert_elements(at, incoming)
    }

    // -- history ---------------------------------------------------------

    pub fn undo(&mut self) -> Result<(), ScriptError> {
        self.undo.undo(&mut self.state.document.elements)?;
        self.after_history_change();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), ScriptError> {
        self.undo.redo(&mut self.state.document.elements)?;
        self.after_history_change();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    // -- cursor and configuration ---------------------------------------

    pub fn cursor(&self) -> Pos {
        self.state.cursor()
    }

    /// Move the cursor; entering a different paragraph re-derives the
    /// current element type from that paragraph
    pub fn set_cursor(&mut self, pos: Pos) {
        self.state.set_cursor(pos);
        self.state.validate_cursor();
        let kind = self
            .state
            .document
            .element(self.state.cursor().paragraph)
            .map(|el| el.kind)
            .unwrap_or(ElementType::Action);
        self.transitions.sync_to(kind);
    }

    pub fn set_selection(&mut self, anchor: Pos, focus: Pos) {
        self.state.set_selection(Some(Selection::new(anchor, focus)));
        self.state.validate_cursor();
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn current_element_type(&self) -> ElementType {
        self.transitions.current()
    }

    pub fn metrics(&self) -> &PageMetrics {
        self.paginator.metrics()
    }

    /// Defer repagination until the next derived read, coalescing bursts
    /// of rapid edits. Debounce, not drop: reads always see final state.
    pub fn set_deferred_pagination(&mut self, deferred: bool) {
        self.deferred = deferred;
        if !deferred {
            self.flush_pagination();
        }
    }

    // -- internals -------------------------------------------------------

    fn target_paragraphs(&self) -> (usize, usize) {
        match self.state.selection() {
            Some(sel) => sel.paragraph_span(),
            None => {
                let p = self.state.cursor().paragraph;
                (p, p)
            }
        }
    }

    /// A locked document keeps every scene heading numbered. Mutations
    /// that can introduce an unnumbered heading run the allocator and
    /// return the assignments as commands, so undo clears them again.
    fn assign_new_scene_numbers(&mut self) -> Vec<Command> {
        if !self.state.document.locked {
            return Vec::new();
        }
        let result = allocate_scene_numbers(&mut self.state.document);
        result
            .assigned
            .into_iter()
            .map(|(paragraph, label)| Command::SetSceneNumber {
                paragraph,
                before: None,
                after: Some(label),
            })
            .collect()
    }

    /// Record an already-applied structural mutation in the undo history
    /// and refresh derived state
    fn record_structural(&mut self, mut commands: Vec<Command>, first_dirty: usize) {
        if commands.is_empty() {
            return;
        }
        let command = match commands.len() {
            1 => commands.remove(0),
            _ => Command::Batch { commands },
        };
        self.undo.push(command, self.state.cursor());
        self.undo.finalize_batch();
        self.state.document.rebuild_ranges();
        self.state.document.metadata.touch();
        self.mark_dirty(first_dirty);
    }

    fn insert_elements(
        &mut self,
        at: usize,
        mut incoming: Vec<ScriptElement>,
    ) -> Result<usize, ScriptError> {
        let len = self.state.document.len();
        if at > len {
            return Err(ScriptError::ParagraphOutOfBounds { index: at, len });
        }

        let used: HashSet<String> = self
            .state
            .document
            .used_scene_numbers()
            .into_iter()
            .collect();
        for el in &mut incoming {
            if let Some(num) = &el.scene_number {
                if used.contains(num) {
                    el.scene_number = None;
                }
            }
            if self.revisions.is_marking() {
                self.revisions.mark_new(el);
            }
        }

        let count = incoming.len();
        let splice = Command::Splice {
            at,
            removed: vec![],
            inserted: incoming,
        };
        splice.execute(&mut self.state.document.elements)?;
        let mut commands = vec![splice];
        commands.extend(self.assign_new_scene_numbers());
        let command = match commands.len() {
            1 => commands.remove(0),
            _ => Command::Batch { commands },
        };
        self.undo.finalize_batch();
        self.undo.push(command, Pos::start_of(at));
        self.undo.finalize_batch();

        self.state.document.rebuild_ranges();
        self.state.document.metadata.touch();

        let last = at + count - 1;
        let end = self
            .state
            .document
            .element(last)
            .map(|el| el.text.chars().count())
            .unwrap_or(0);
        self.state.set_cursor(Pos::new(last, end));
        let kind = self
            .state
            .document
            .element(last)
            .map(|el| el.kind)
            .unwrap_or(ElementType::Action);
        self.transitions.sync_to(kind);
        self.mark_structure_dirty();
        Ok(count)
    }

    fn move_cursor_to_previous_end(&mut self, idx: usize) -> Result<ElementType, ScriptError> {
        let prev = idx.saturating_sub(1);
        let len = self.state.document.len();
        let (kind, end) = self
            .state
            .document
            .element(prev)
            .map(|el| (el.kind, el.text.chars().count()))
            .ok_or(ScriptError::ParagraphOutOfBounds { index: prev, len })?;
        self.state.set_cursor(Pos::new(prev, end));
        self.transitions.sync_to(kind);
        Ok(kind)
    }

    fn after_history_change(&mut self) {
        self.state.document.ensure_element();
        self.state.document.rebuild_ranges();
        self.state.document.metadata.touch();
        self.state.validate_cursor();
        let kind = self
            .state
            .document
            .element(self.state.cursor().paragraph)
            .map(|el| el.kind)
            .unwrap_or(ElementType::Action);
        self.transitions.sync_to(kind);
        self.mark_structure_dirty();
    }

    fn mark_dirty(&mut self, paragraph: usize) {
        self.first_dirty = Some(self.first_dirty.map_or(paragraph, |d| d.min(paragraph)));
        if !self.deferred {
            self.flush_pagination();
        }
    }

    fn mark_structure_dirty(&mut self) {
        self.structure_dirty = true;
        if !self.deferred {
            self.flush_pagination();
        }
    }

    fn flush_pagination(&mut self) {
        if self.structure_dirty || self.page_map.slices.is_empty() {
            self.page_map = self.paginator.paginate(&self.state.document);
        } else if let Some(dirty) = self.first_dirty {
            self.page_map = self
                .paginator
                .paginate_from(&self.state.document, &self.page_map, dirty);
        } else {
            return;
        }
        self.structure_dirty = false;
        self.first_dirty = None;
    }
}

impl Default for ScriptEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Reclassify one element in place, recording the reversal commands
fn retype_element(
    el: &mut ScriptElement,
    idx: usize,
    kind: ElementType,
    commands: &mut Vec<Command>,
) {
    if el.kind != kind {
        commands.push(Command::SetKind {
            paragraph: idx,
            before: el.kind,
            after: kind,
        });
        el.kind = kind;
        // a paragraph retyped away from a heading is no longer a scene;
        // its label returns to the pool instead of shadowing a live one
        if kind != ElementType::SceneHeading {
            if let Some(label) = el.scene_number.take() {
                commands.push(Command::SetSceneNumber {
                    paragraph: idx,
                    before: Some(label),
                    after: None,
                });
            }
        }
    }
    let formatted = apply_formatting(kind, &el.text);
    if formatted != el.text {
        commands.push(Command::ReplaceText {
            paragraph: idx,
            before: el.text.clone(),
            after: formatted.clone(),
        });
        el.text = formatted;
    }
}

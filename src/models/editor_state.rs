//! Editor state management
//!
//! EditorState is the owned source of truth for an open script: the document
//! plus cursor and selection. Positions address a paragraph and a character
//! offset inside it.

use serde::{Deserialize, Serialize};

use crate::models::core::ScriptDocument;

/// Caret position: paragraph index plus char offset within the paragraph
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos {
    pub paragraph: usize,
    pub offset: usize,
}

impl Pos {
    pub fn new(paragraph: usize, offset: usize) -> Self {
        Self { paragraph, offset }
    }

    /// Start of a paragraph
    pub fn start_of(paragraph: usize) -> Self {
        Self { paragraph, offset: 0 }
    }
}

/// A selection between two positions. `anchor` is where the selection
/// started, `focus` is where the cursor is; either may come first.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Pos,
    pub focus: Pos,
}

impl Selection {
    pub fn new(anchor: Pos, focus: Pos) -> Self {
        Self { anchor, focus }
    }

    /// Selection bounds in document order
    pub fn normalized(&self) -> (Pos, Pos) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.focus
    }

    /// Paragraph index range covered by the selection, inclusive
    pub fn paragraph_span(&self) -> (usize, usize) {
        let (start, end) = self.normalized();
        (start.paragraph, end.paragraph)
    }
}

/// Complete editor state for one open script
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EditorState {
    /// The document being edited
    pub document: ScriptDocument,

    /// Current cursor position
    pub cursor: Pos,

    /// Current selection (if any)
    pub selection: Option<Selection>,
}

impl EditorState {
    /// Create a new editor state with a document
    pub fn new(document: ScriptDocument) -> Self {
        Self {
            document,
            cursor: Pos::default(),
            selection: None,
        }
    }

    pub fn cursor(&self) -> Pos {
        self.cursor
    }

    /// Set the cursor position. Moving the cursor explicitly drops any
    /// active selection.
    pub fn set_cursor(&mut self, pos: Pos) {
        self.cursor = pos;
        self.selection = None;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Clamp the cursor to document bounds. Paragraph indices past the end
    /// land on the last paragraph, offsets past the text land at its end.
    pub fn validate_cursor(&mut self) {
        self.cursor = self.clamped(self.cursor);
        if let Some(sel) = self.selection {
            self.selection = Some(Selection::new(
                self.clamped(sel.anchor),
                self.clamped(sel.focus),
            ));
        }
    }

    fn clamped(&self, mut pos: Pos) -> Pos {
        if self.document.is_empty() {
            return Pos::default();
        }
        if pos.paragraph >= self.document.len() {
            pos.paragraph = self.document.len() - 1;
        }
        let max_offset = self
            .document
            .element(pos.paragraph)
            .map(|el| el.text.chars().count())
            .unwrap_or(0);
        if pos.offset > max_offset {
            pos.offset = max_offset;
        }
        pos
    }
}

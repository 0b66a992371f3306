//! Element-type transition state machine
//!
//! Decides what type a paragraph takes on commit (Enter), cycle (Tab) and
//! explicit-set events, driven entirely by the tables in
//! `models::elements`. The engine owns the cursor-local "current type";
//! the editor applies the returned decisions to the document.

use crate::models::elements::ElementType;

/// What the editor should do with the paragraph being committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    /// Insert a paragraph break; the new paragraph takes this type
    Split { next: ElementType },

    /// No new break; retype the existing empty paragraph in place
    Retype { next: ElementType },
}

impl CommitAction {
    /// The type the cursor paragraph ends up in after the action
    pub fn resulting_type(&self) -> ElementType {
        match self {
            CommitAction::Split { next } => *next,
            CommitAction::Retype { next } => *next,
        }
    }
}

/// Cursor-local element-type state machine.
///
/// The current type tracks the paragraph under the cursor. It is advanced by
/// commits and cycles, and re-derived from the document whenever a deletion
/// or cursor move lands on a different paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEngine {
    current: ElementType,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self {
            current: ElementType::default(),
        }
    }

    pub fn current(&self) -> ElementType {
        self.current
    }

    /// Re-derive the current type from a paragraph's stored kind. Used after
    /// any deletion or cursor move that lands on a different paragraph, so
    /// stale cursor-local state is never trusted.
    pub fn sync_to(&mut self, kind: ElementType) {
        self.current = kind;
    }

    /// Enter pressed in a paragraph of the current type.
    ///
    /// Non-empty paragraphs split; the new paragraph takes the
    /// next-on-content type. Empty paragraphs are retyped in place to the
    /// next-on-empty type so double-Enter cycles types without piling up
    /// blank paragraphs.
    pub fn commit(&mut self, paragraph_is_empty: bool) -> CommitAction {
        let style = self.current.style();
        let action = if paragraph_is_empty {
            CommitAction::Retype {
                next: style.next_on_empty,
            }
        } else {
            CommitAction::Split {
                next: style.next_on_content,
            }
        };
        self.current = action.resulting_type();
        action
    }

    /// Tab / Shift-Tab: step the current type through its cycle ring
    pub fn cycle(&mut self, backward: bool) -> ElementType {
        self.current = cycle_type(self.current, backward);
        self.current
    }

    /// Explicit type selection. Idempotent: setting the current type again
    /// returns the same type and changes nothing.
    pub fn set_current(&mut self, kind: ElementType) -> ElementType {
        self.current = kind;
        self.current
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Next or previous entry in a type's Tab-cycle ring
pub fn cycle_type(kind: ElementType, backward: bool) -> ElementType {
    let ring = kind.style().tab_cycle;
    let pos = ring.iter().position(|k| *k == kind).unwrap_or(0);
    let next = if backward {
        (pos + ring.len() - 1) % ring.len()
    } else {
        (pos + 1) % ring.len()
    };
    ring[next]
}

/// Apply a type's formatting transform to paragraph text.
///
/// Currently the only content transform is uppercasing; geometry and
/// alignment are layout concerns. Idempotent for every type.
pub fn apply_formatting(kind: ElementType, text: &str) -> String {
    if kind.needs_uppercase() {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

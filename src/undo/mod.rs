use crate::editor::ScriptError;
use crate::models::core::ScriptElement;
use crate::models::editor_state::Pos;
use crate::models::elements::{ElementType, RevisionColor};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The revision fields of one element, captured for reversal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevisionSnapshot {
    pub color: Option<RevisionColor>,
    pub revision_id: Option<i32>,
    pub original_text: Option<String>,
    pub is_new_in_revision: bool,
}

impl RevisionSnapshot {
    pub fn capture(element: &ScriptElement) -> Self {
        Self {
            color: element.revision_color,
            revision_id: element.revision_id,
            original_text: element.original_text.clone(),
            is_new_in_revision: element.is_new_in_revision,
        }
    }

    pub fn apply(&self, element: &mut ScriptElement) {
        element.revision_color = self.color;
        element.revision_id = self.revision_id;
        element.original_text = self.original_text.clone();
        element.is_new_in_revision = self.is_new_in_revision;
    }
}

/// Represents a reversible edit command
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Replace a paragraph's text
    ReplaceText {
        paragraph: usize,
        before: String,
        after: String,
    },
    /// Change a paragraph's element type
    SetKind {
        paragraph: usize,
        before: ElementType,
        after: ElementType,
    },
    /// Replace `removed` whole elements at `at` with `inserted`. Covers
    /// splits, merges, paragraph deletion, paste, and omission.
    Splice {
        at: usize,
        removed: Vec<ScriptElement>,
        inserted: Vec<ScriptElement>,
    },
    /// Revision stamp on one paragraph
    MarkRevision {
        paragraph: usize,
        before: RevisionSnapshot,
        after: RevisionSnapshot,
    },
    /// Scene number assigned to (or cleared from) a heading
    SetSceneNumber {
        paragraph: usize,
        before: Option<String>,
        after: Option<String>,
    },
    /// A batch of commands grouped together (e.g. typing a word)
    Batch { commands: Vec<Command> },
}

impl Command {
    /// Apply this command to the element list
    pub fn execute(&self, elements: &mut Vec<ScriptElement>) -> Result<(), ScriptError> {
        match self {
            Command::ReplaceText { paragraph, after, .. } => {
                let el = element_mut(elements, *paragraph)?;
                el.text = after.clone();
                Ok(())
            }
            Command::SetKind { paragraph, after, .. } => {
                element_mut(elements, *paragraph)?.kind = *after;
                Ok(())
            }
            Command::Splice { at, removed, inserted } => {
                splice(elements, *at, removed.len(), inserted)
            }
            Command::MarkRevision { paragraph, after, .. } => {
                after.apply(element_mut(elements, *paragraph)?);
                Ok(())
            }
            Command::SetSceneNumber { paragraph, after, .. } => {
                element_mut(elements, *paragraph)?.scene_number = after.clone();
                Ok(())
            }
            Command::Batch { commands } => {
                for cmd in commands {
                    cmd.execute(elements)?;
                }
                Ok(())
            }
        }
    }

    /// Undo this command (reverse the operation)
    pub fn undo(&self, elements: &mut Vec<ScriptElement>) -> Result<(), ScriptError> {
        match self {
            Command::ReplaceText { paragraph, before, .. } => {
                let el = element_mut(elements, *paragraph)?;
                el.text = before.clone();
                Ok(())
            }
            Command::SetKind { paragraph, before, .. } => {
                element_mut(elements, *paragraph)?.kind = *before;
                Ok(())
            }
            Command::Splice { at, removed, inserted } => {
                splice(elements, *at, inserted.len(), removed)
            }
            Command::MarkRevision { paragraph, before, .. } => {
                before.apply(element_mut(elements, *paragraph)?);
                Ok(())
            }
            Command::SetSceneNumber { paragraph, before, .. } => {
                element_mut(elements, *paragraph)?.scene_number = before.clone();
                Ok(())
            }
            Command::Batch { commands } => {
                // undo batch in reverse order
                for cmd in commands.iter().rev() {
                    cmd.undo(elements)?;
                }
                Ok(())
            }
        }
    }

    /// The paragraph index this command touches first
    pub fn affected_paragraph(&self) -> usize {
        match self {
            Command::ReplaceText { paragraph, .. } => *paragraph,
            Command::SetKind { paragraph, .. } => *paragraph,
            Command::Splice { at, .. } => *at,
            Command::MarkRevision { paragraph, .. } => *paragraph,
            Command::SetSceneNumber { paragraph, .. } => *paragraph,
            Command::Batch { commands } => commands
                .first()
                .map(|c| c.affected_paragraph())
                .unwrap_or(0),
        }
    }
}

fn element_mut(
    elements: &mut [ScriptElement],
    index: usize,
) -> Result<&mut ScriptElement, ScriptError> {
    let len = elements.len();
    elements
        .get_mut(index)
        .ok_or(ScriptError::ParagraphOutOfBounds { index, len })
}

fn splice(
    elements: &mut Vec<ScriptElement>,
    at: usize,
    take: usize,
    put: &[ScriptElement],
) -> Result<(), ScriptError> {
    if at + take > elements.len() {
        return Err(ScriptError::ParagraphOutOfBounds {
            index: at,
            len: elements.len(),
        });
    }
    elements.splice(at..at + take, put.iter().cloned());
    Ok(())
}

/// Manages undo/redo command history with keystroke batching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoStack {
    /// Stack of commands that can be undone
    pub commands: VecDeque<Command>,
    /// Current position in the stack (for redo support)
    pub current_index: usize,
    /// Maximum number of commands to keep in history
    max_size: usize,
    /// Current batch being accumulated (if any)
    #[serde(skip)]
    current_batch: Option<Vec<Command>>,
    /// Paragraph of the last recorded edit (for batch breaks)
    #[serde(skip)]
    last_paragraph: Option<usize>,
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PartialEq for UndoStack {
    fn eq(&self, other: &Self) -> bool {
        // Only compare serialized fields (skip transient fields)
        self.commands == other.commands
            && self.current_index == other.current_index
            && self.max_size == other.max_size
    }
}

impl UndoStack {
    /// Create a new undo stack with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            commands: VecDeque::new(),
            current_index: 0,
            max_size,
            current_batch: None,
            last_paragraph: None,
        }
    }

    /// Add a command to the stack with keystroke batching.
    ///
    /// Consecutive text replacements in one paragraph coalesce into a
    /// single command, so undoing typing steps back a word at a time
    /// rather than a keystroke at a time. Batching breaks on:
    /// - moving to a different paragraph
    /// - a change of operation kind (typing vs structural edit)
    /// - a whitespace keystroke (word boundary)
    pub fn push(&mut self, command: Command, cursor: Pos) {
        if self.should_break_batch(&command, cursor) {
            self.finalize_batch();
        }

        let paragraph = command.affected_paragraph();
        match self.current_batch.as_mut() {
            Some(batch) => {
                if !try_coalesce(batch, &command) {
                    batch.push(command);
                }
            }
            None => self.current_batch = Some(vec![command]),
        }
        self.last_paragraph = Some(paragraph);
    }

    fn should_break_batch(&self, command: &Command, cursor: Pos) -> bool {
        let Some(batch) = &self.current_batch else {
            return false;
        };

        // break on leaving the paragraph
        if self.last_paragraph != Some(cursor.paragraph)
            || command.affected_paragraph() != cursor.paragraph
        {
            return true;
        }

        // break on operation kind change (typing vs structural)
        if let Some(last) = batch.last() {
            let last_is_text = matches!(last, Command::ReplaceText { .. });
            let current_is_text = matches!(command, Command::ReplaceText { .. });
            if last_is_text != current_is_text {
                return true;
            }
        }

        // break on a whitespace keystroke, so words undo as units
        if let Command::ReplaceText { before, after, .. } = command {
            if after.len() > before.len() && after.ends_with(|c: char| c.is_whitespace()) {
                return true;
            }
        }

        false
    }

    /// Finalize the current batch and add it to the undo stack
    pub fn finalize_batch(&mut self) {
        let Some(batch) = self.current_batch.take() else {
            return;
        };
        if batch.is_empty() {
            return;
        }
        let command = if batch.len() == 1 {
            batch.into_iter().next().unwrap()
        } else {
            Command::Batch { commands: batch }
        };

        // Truncate any redo history when new command is added
        self.commands.truncate(self.current_index);
        self.commands.push_back(command);
        self.current_index = self.commands.len();

        // Enforce max size
        if self.commands.len() > self.max_size {
            self.commands.pop_front();
            self.current_index = self.current_index.saturating_sub(1);
        }
    }

    /// Undo the last command
    pub fn undo(&mut self, elements: &mut Vec<ScriptElement>) -> Result<(), ScriptError> {
        // Finalize any pending batch first
        self.finalize_batch();

        if !self.can_undo() {
            return Err(ScriptError::NothingToUndo);
        }

        self.current_index -= 1;
        let command = &self.commands[self.current_index];
        command.undo(elements)
    }

    /// Redo the last undone command
    pub fn redo(&mut self, elements: &mut Vec<ScriptElement>) -> Result<(), ScriptError> {
        if !self.can_redo() {
            return Err(ScriptError::NothingToRedo);
        }

        let command = &self.commands[self.current_index];
        command.execute(elements)?;
        self.current_index += 1;
        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.current_index > 0 || self.current_batch.is_some()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.current_index < self.commands.len()
    }

    /// Clear all undo history
    pub fn clear(&mut self) {
        self.commands.clear();
        self.current_index = 0;
        self.current_batch = None;
        self.last_paragraph = None;
    }

    /// Get the number of available undo steps
    pub fn undo_count(&self) -> usize {
        self.current_index + usize::from(self.current_batch.is_some())
    }

    /// Get the number of available redo steps
    pub fn redo_count(&self) -> usize {
        self.commands.len() - self.current_index
    }
}

/// Merge a text replacement into the batch's last command when they chain
fn try_coalesce(batch: &mut [Command], command: &Command) -> bool {
    let Command::ReplaceText { paragraph, before, after } = command else {
        return false;
    };
    let Some(Command::ReplaceText {
        paragraph: last_paragraph,
        after: last_after,
        ..
    }) = batch.last_mut()
    else {
        return false;
    };
    if last_paragraph != paragraph || last_after != before {
        return false;
    }
    *last_after = after.clone();
    true
}

//! Core data structures for the screenplay editor
//!
//! A document is an ordered list of paragraph-level elements. Everything
//! else (pagination, revision marks, scene numbering) is derived from or
//! attached to this list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::elements::{ElementType, RevisionColor};

fn new_element_id() -> Uuid {
    Uuid::new_v4()
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// One screenplay paragraph: a typed run of text plus its production state.
///
/// `scene_number`, the `revision_*` fields and `is_omitted` are persistent
/// production metadata. They survive serialization and are never recomputed
/// from the text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScriptElement {
    /// Stable identity, kept across retypes and edits
    #[serde(default = "new_element_id")]
    pub id: Uuid,

    /// Element type driving indentation, width and casing
    #[serde(default)]
    pub kind: ElementType,

    /// Paragraph text after formatting transforms (uppercasing etc.)
    #[serde(default)]
    pub text: String,

    /// Assigned scene number label, e.g. "12" or "A12"; set at lock time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<String>,

    /// Scene deleted after lock: the heading stays as a numbered placeholder
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_omitted: bool,

    /// Color of the revision pass that last touched this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_color: Option<RevisionColor>,

    /// Monotonic id of the revision pass that marked this element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<i32>,

    /// Text as it stood before the current revision pass first touched it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,

    /// Inserted (not merely edited) during the current revision pass
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_new_in_revision: bool,
}

impl ScriptElement {
    /// Create a new element with a fresh identity
    pub fn new(kind: ElementType, text: impl Into<String>) -> Self {
        Self {
            id: new_element_id(),
            kind,
            text: text.into(),
            scene_number: None,
            is_omitted: false,
            revision_color: None,
            revision_id: None,
            original_text: None,
            is_new_in_revision: false,
        }
    }

    /// Empty action paragraph, the default state of a fresh line
    pub fn empty() -> Self {
        Self::new(ElementType::Action, "")
    }

    /// Clone carrying all production state but a fresh identity.
    /// Used on paste so duplicated paragraphs never share an id.
    pub fn with_new_id(&self) -> Self {
        let mut el = self.clone();
        el.id = new_element_id();
        el
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_scene_heading(&self) -> bool {
        self.kind == ElementType::SceneHeading
    }

    /// Text as it should appear on the page. Omitted scenes render the
    /// placeholder regardless of any retained text.
    pub fn display_text(&self) -> &str {
        if self.is_omitted {
            "OMITTED"
        } else {
            &self.text
        }
    }

    /// Carries a mark from an actual revision pass (White never marks)
    pub fn is_revised(&self) -> bool {
        self.revision_color.map(|c| c.is_revision()).unwrap_or(false)
    }

    /// Drop all revision state, keeping text and type as they stand
    pub fn clear_revision(&mut self) {
        self.revision_color = None;
        self.revision_id = None;
        self.original_text = None;
        self.is_new_in_revision = false;
    }
}

impl Default for ScriptElement {
    fn default() -> Self {
        Self::empty()
    }
}

/// Character range of one paragraph inside the concatenated document text
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharRange {
    pub start: usize,
    pub end: usize,
}

impl CharRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Document-level production metadata
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DocumentMetadata {
    /// Script title, as shown on the title page and in page banners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Writer credit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Creation and modification timestamps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

impl DocumentMetadata {
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            created_at: Some(now.clone()),
            modified_at: Some(now),
            ..Default::default()
        }
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.modified_at = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// The screenplay itself: ordered elements plus locked-numbering state.
///
/// `ranges` maps each paragraph to its character range in the concatenated
/// text. It is derived and rebuilt after every structural edit, never
/// serialized.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScriptDocument {
    /// Production metadata
    #[serde(default)]
    pub metadata: DocumentMetadata,

    /// Ordered paragraph elements
    #[serde(default)]
    pub elements: Vec<ScriptElement>,

    /// Scene numbers frozen; scene edits switch to omit/interpolate rules
    #[serde(default)]
    pub locked: bool,

    #[serde(skip)]
    ranges: Vec<CharRange>,
}

impl ScriptDocument {
    /// Create a new document holding a single empty action paragraph
    pub fn new() -> Self {
        let mut doc = Self {
            metadata: DocumentMetadata::new(),
            elements: vec![ScriptElement::empty()],
            locked: false,
            ranges: Vec::new(),
        };
        doc.rebuild_ranges();
        doc
    }

    /// Build a document from loaded elements. An empty list yields a single
    /// empty action paragraph so the editor always has a cursor target.
    pub fn from_elements(elements: Vec<ScriptElement>) -> Self {
        let mut doc = Self {
            metadata: DocumentMetadata::new(),
            elements,
            locked: false,
            ranges: Vec::new(),
        };
        doc.ensure_element();
        doc.rebuild_ranges();
        doc
    }

    /// Documents never go below one paragraph
    pub fn ensure_element(&mut self) {
        if self.elements.is_empty() {
            self.elements.push(ScriptElement::empty());
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, index: usize) -> Option<&ScriptElement> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut ScriptElement> {
        self.elements.get_mut(index)
    }

    /// Insert an element and reindex
    pub fn insert_element(&mut self, index: usize, element: ScriptElement) {
        self.elements.insert(index, element);
        self.rebuild_ranges();
    }

    /// Remove an element and reindex. The document is refilled with one
    /// empty action paragraph if the last element was removed.
    pub fn remove_element(&mut self, index: usize) -> Option<ScriptElement> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        self.ensure_element();
        self.rebuild_ranges();
        Some(removed)
    }

    /// Rebuild the paragraph range index over the concatenated display text.
    /// Paragraphs are separated by a single newline; each range excludes its
    /// trailing separator. Offsets count chars, not bytes.
    pub fn rebuild_ranges(&mut self) {
        self.ranges.clear();
        let mut offset = 0usize;
        for el in &self.elements {
            let len = el.display_text().chars().count();
            self.ranges.push(CharRange::new(offset, offset + len));
            offset += len + 1;
        }
    }

    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    /// Paragraph index owning a character offset in the concatenated text.
    /// Offsets sitting on a separator resolve to the paragraph before it;
    /// offsets past the end clamp to the last paragraph.
    pub fn paragraph_at_offset(&self, offset: usize) -> Option<usize> {
        if self.ranges.is_empty() {
            return None;
        }
        self.ranges
            .iter()
            .position(|r| offset <= r.end)
            .or(Some(self.ranges.len() - 1))
    }

    /// Concatenated display text, paragraphs separated by newlines
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for (i, el) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(el.display_text());
        }
        out
    }

    /// Scene headings in document order, with their paragraph indices
    pub fn scene_headings(&self) -> impl Iterator<Item = (usize, &ScriptElement)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.is_scene_heading())
    }

    /// Scene number labels currently assigned, in document order
    pub fn used_scene_numbers(&self) -> Vec<String> {
        self.scene_headings()
            .filter_map(|(_, el)| el.scene_number.clone())
            .collect()
    }
}

impl Default for ScriptDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Clipboard payload: typed elements plus a plain-text fallback.
///
/// Consumers that only understand text take `text`; pasting back into the
/// editor restores full typing and production state from `elements`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CopyPayload {
    pub text: String,
    pub elements: Vec<ScriptElement>,
}

impl CopyPayload {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

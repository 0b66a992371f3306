//! Revision-pass tracking
//!
//! Production revisions tag every changed line with the color of the pass
//! that introduced it. The tracker holds the active pass (color, id, date)
//! and stamps paragraphs on edit events, honoring the palette's override
//! priority: marks are monotonically non-decreasing across passes.
//!
//! Only genuine insertions mark. Deleting from a paragraph never does.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::core::{ScriptDocument, ScriptElement};
use crate::models::elements::RevisionColor;

/// One margin mark: a revised paragraph and the color that marked it
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarginMark {
    pub paragraph: usize,
    pub color: RevisionColor,
}

/// Page-level revision banner: the strongest color on the page plus the
/// date of the pass that introduced it
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBanner {
    pub color: RevisionColor,
    pub date: NaiveDate,
}

impl PageBanner {
    /// Banner text in the conventional header form, e.g. "BLUE REVISION 03/12/24"
    pub fn label(&self) -> String {
        format!(
            "{} REVISION {}",
            self.color.name().to_uppercase(),
            self.date.format("%m/%d/%y")
        )
    }
}

/// Active revision pass state and the paragraph-marking rules
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionTracker {
    active_color: Option<RevisionColor>,
    active_revision_id: Option<i32>,
    /// Date recorded for each color pass seen this session, latest wins
    pass_dates: Vec<(RevisionColor, NaiveDate)>,
}

impl RevisionTracker {
    pub fn new() -> Self {
        Self {
            active_color: None,
            active_revision_id: None,
            pass_dates: Vec::new(),
        }
    }

    /// Begin or end a pass. `None` and `White` both mean no active pass.
    /// The pass is dated today; tests inject a date via
    /// [`set_active_with_date`](Self::set_active_with_date).
    pub fn set_active(&mut self, color: Option<RevisionColor>, revision_id: i32) {
        self.set_active_with_date(color, revision_id, chrono::Utc::now().date_naive());
    }

    /// Begin or end a pass with an explicit date stamp
    pub fn set_active_with_date(
        &mut self,
        color: Option<RevisionColor>,
        revision_id: i32,
        date: NaiveDate,
    ) {
        self.active_color = color.filter(|c| c.is_revision());
        self.active_revision_id = self.active_color.map(|_| revision_id);
        if let Some(c) = self.active_color {
            self.pass_dates.retain(|(pc, _)| *pc != c);
            self.pass_dates.push((c, date));
        }
    }

    pub fn active_color(&self) -> Option<RevisionColor> {
        self.active_color
    }

    pub fn active_revision_id(&self) -> Option<i32> {
        self.active_revision_id
    }

    /// Whether edits are currently being marked
    pub fn is_marking(&self) -> bool {
        self.active_color.is_some()
    }

    /// Stamp a paragraph after a content change.
    ///
    /// `was_insertion` is the one-bit flag computed by the edit operation;
    /// when false (pure deletion) the paragraph is never touched. An existing
    /// mark is overwritten only by a strictly higher-priority color, so a
    /// Pink paragraph stays Pink through a later Blue pass. Returns whether
    /// the mark changed.
    ///
    /// `text_before_edit` is captured into `original_text` the first time
    /// this pass touches the paragraph.
    pub fn mark_edit(
        &self,
        element: &mut ScriptElement,
        was_insertion: bool,
        text_before_edit: &str,
    ) -> bool {
        if !was_insertion {
            return false;
        }
        let active = match self.active_color {
            Some(c) => c,
            None => return false,
        };

        let existing = element
            .revision_color
            .map(|c| c.priority())
            .unwrap_or(RevisionColor::White.priority());
        if active.priority() <= existing {
            return false;
        }

        let first_touch_of_pass = element.revision_id != self.active_revision_id;
        if first_touch_of_pass && !element.is_new_in_revision {
            element.original_text = Some(text_before_edit.to_string());
        }
        element.revision_color = Some(active);
        element.revision_id = self.active_revision_id;
        true
    }

    /// Stamp a paragraph created (not merely edited) during the active pass.
    /// New paragraphs have no prior text, so `original_text` stays unset.
    pub fn mark_new(&self, element: &mut ScriptElement) -> bool {
        let active = match self.active_color {
            Some(c) => c,
            None => return false,
        };
        element.revision_color = Some(active);
        element.revision_id = self.active_revision_id;
        element.is_new_in_revision = true;
        true
    }

    /// Highest-priority color among the paragraphs in `range`, as a dated
    /// banner. `None` when nothing in the range is revised.
    pub fn banner_for_range(
        &self,
        doc: &ScriptDocument,
        range: std::ops::Range<usize>,
    ) -> Option<PageBanner> {
        let color = doc.elements[range.start.min(doc.len())..range.end.min(doc.len())]
            .iter()
            .filter_map(|el| el.revision_color)
            .filter(|c| c.is_revision())
            .max_by_key(|c| c.priority())?;
        Some(PageBanner {
            color,
            date: self.date_for(color),
        })
    }

    fn date_for(&self, color: RevisionColor) -> NaiveDate {
        self.pass_dates
            .iter()
            .find(|(c, _)| *c == color)
            .map(|(_, d)| *d)
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

impl Default for RevisionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered (paragraph, color) pairs for the margin-mark column
pub fn margin_marks(doc: &ScriptDocument) -> Vec<MarginMark> {
    doc.elements
        .iter()
        .enumerate()
        .filter_map(|(i, el)| {
            el.revision_color
                .filter(|c| c.is_revision())
                .map(|color| MarginMark {
                    paragraph: i,
                    color,
                })
        })
        .collect()
}

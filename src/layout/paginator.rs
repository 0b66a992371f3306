//! Screenplay pagination
//!
//! Partitions the element sequence into fixed-capacity pages. Breaking is
//! done at wrapped-line granularity, with three keep-together rules applied
//! ahead of the default break: a scene heading needs at least one line of
//! following content, a character cue needs a line of its dialogue block,
//! and a parenthetical needs a line of the dialogue it introduces.
//!
//! Pagination is a pure function of `(element type, display text)` pairs
//! and the page metrics. It never reorders elements; it only partitions.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::layout::measure::measure_element;
use crate::models::core::ScriptDocument;
use crate::models::elements::ElementType;

/// Page geometry and limits, threaded in at construction
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PageMetrics {
    /// Content lines per page: US letter at 6 lines per inch inside
    /// one-inch top and bottom margins
    pub lines_per_page: usize,

    /// Safety cap on the number of pages produced in one pass
    pub max_pages: usize,

    /// Seal the page where a run of title-page elements ends
    pub break_after_title_page: bool,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            lines_per_page: 54,
            max_pages: 1000,
            break_after_title_page: true,
        }
    }
}

/// A (paragraph, wrapped-line) position in the document
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinePos {
    pub paragraph: usize,
    pub line: usize,
}

impl LinePos {
    pub fn new(paragraph: usize, line: usize) -> Self {
        Self { paragraph, line }
    }
}

/// One page: the half-open [start, end) span of line positions it holds.
/// `end` equals the next page's `start`; a mid-paragraph boundary means the
/// paragraph splits across the two pages.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSlice {
    pub start: LinePos,
    pub end: LinePos,
}

impl PageSlice {
    /// Whether any line of the paragraph lands on this page
    pub fn contains_paragraph(&self, index: usize) -> bool {
        index >= self.start.paragraph
            && (index < self.end.paragraph
                || (index == self.end.paragraph && self.end.line > 0))
    }

    /// Paragraph indices touched by this page
    pub fn paragraph_range(&self) -> Range<usize> {
        let end = if self.end.line > 0 {
            self.end.paragraph + 1
        } else {
            self.end.paragraph
        };
        self.start.paragraph..end
    }
}

/// Where an element's first content line landed
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,

    /// Line offset from the top of that page
    pub y_line: usize,
}

/// Derived page map for a document. Never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PageMap {
    pub slices: Vec<PageSlice>,

    /// Placement per element, in document order. Shorter than the element
    /// list only when `capped` cut pagination short.
    pub placements: Vec<Placement>,

    /// The safety limit truncated pagination; a reported condition, not an
    /// error
    pub capped: bool,
}

impl PageMap {
    pub fn empty() -> Self {
        Self {
            slices: Vec::new(),
            placements: Vec::new(),
            capped: false,
        }
    }

    pub fn page_count(&self) -> usize {
        self.slices.len()
    }

    /// First page holding any line of the paragraph
    pub fn page_of_paragraph(&self, index: usize) -> Option<usize> {
        self.slices.iter().position(|s| s.contains_paragraph(index))
    }

    /// Paragraphs touched by a page; empty range for an out-of-range page
    pub fn paragraph_range(&self, page: usize) -> Range<usize> {
        self.slices
            .get(page)
            .map(|s| s.paragraph_range())
            .unwrap_or(0..0)
    }
}

impl Default for PageMap {
    fn default() -> Self {
        Self::empty()
    }
}

/// Companion lines a protected type must carry onto a page: the gap before
/// the next element plus one line of it. `None` when no rule applies.
fn keep_requirement(doc: &ScriptDocument, index: usize) -> Option<usize> {
    let next_kind = doc.elements.get(index + 1).map(|n| n.kind);
    match doc.elements[index].kind {
        // a heading is kept with one line of whatever follows it
        ElementType::SceneHeading => next_kind.map(|nk| nk.style().blank_lines_before + 1),
        ElementType::Character => match next_kind {
            Some(nk @ (ElementType::Dialogue | ElementType::Parenthetical)) => {
                Some(nk.style().blank_lines_before + 1)
            }
            _ => None,
        },
        ElementType::Parenthetical => match next_kind {
            Some(nk @ ElementType::Dialogue) => Some(nk.style().blank_lines_before + 1),
            _ => None,
        },
        _ => None,
    }
}

/// Accumulates pages during one pagination pass
struct PageRun {
    capacity: usize,
    max_pages: usize,
    base_page: usize,
    slices: Vec<PageSlice>,
    page_start: LinePos,
    used: usize,
}

impl PageRun {
    fn current_page(&self) -> usize {
        self.base_page + self.slices.len()
    }

    fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    fn at_top(&self) -> bool {
        self.used == 0
    }

    /// Close the current page at `boundary`. False once the page cap is hit.
    fn seal(&mut self, boundary: LinePos) -> bool {
        self.slices.push(PageSlice {
            start: self.page_start,
            end: boundary,
        });
        self.page_start = boundary;
        self.used = 0;
        self.base_page + self.slices.len() < self.max_pages
    }
}

struct RunOutput {
    slices: Vec<PageSlice>,
    placements: Vec<Placement>,
    capped: bool,
}

/// The pagination engine. Metrics are fixed at construction; documents are
/// passed per call, so one paginator serves any number of passes.
#[derive(Debug, Clone)]
pub struct Paginator {
    metrics: PageMetrics,
}

impl Paginator {
    pub fn new(metrics: PageMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &PageMetrics {
        &self.metrics
    }

    /// Paginate the whole document from scratch
    pub fn paginate(&self, doc: &ScriptDocument) -> PageMap {
        let out = self.run(doc, LinePos::new(0, 0), 0);
        PageMap {
            slices: out.slices,
            placements: out.placements,
            capped: out.capped,
        }
    }

    /// Repaginate reusing `previous` pages untouched by the edit.
    ///
    /// Pages strictly before the page preceding the first dirty paragraph
    /// cannot change: every decision that shaped them involves only clean
    /// elements. The scan restarts at that page boundary. Anything
    /// uncertain (missing map, capped map, dirty head) falls back to a full
    /// pass. Equal to [`paginate`](Self::paginate) for the same input.
    pub fn paginate_from(
        &self,
        doc: &ScriptDocument,
        previous: &PageMap,
        first_dirty: usize,
    ) -> PageMap {
        if previous.capped || previous.slices.is_empty() {
            return self.paginate(doc);
        }
        let dirty_page = match previous.page_of_paragraph(first_dirty) {
            Some(p) => p,
            None => return self.paginate(doc),
        };
        if dirty_page < 2 {
            return self.paginate(doc);
        }

        let restart = dirty_page - 1;
        let boundary = previous.slices[restart].start;
        if boundary.paragraph >= doc.len() {
            return self.paginate(doc);
        }

        let tail = self.run(doc, boundary, restart);

        let mut slices = previous.slices[..restart].to_vec();
        slices.extend(tail.slices);

        // the carry-in paragraph (if the boundary is mid-element) kept its
        // placement from the prefix
        let keep = boundary.paragraph + usize::from(boundary.line > 0);
        let mut placements = previous.placements[..keep.min(previous.placements.len())].to_vec();
        placements.extend(tail.placements);

        PageMap {
            slices,
            placements,
            capped: tail.capped,
        }
    }

    /// Scan elements from `start`, producing pages numbered from
    /// `base_page`. `start` must be a page boundary of a consistent map.
    fn run(&self, doc: &ScriptDocument, start: LinePos, base_page: usize) -> RunOutput {
        let mut run = PageRun {
            capacity: self.metrics.lines_per_page.max(1),
            max_pages: self.metrics.max_pages.max(1),
            base_page,
            slices: Vec::new(),
            page_start: start,
            used: 0,
        };
        let mut placements: Vec<Placement> = Vec::new();
        let mut capped = false;

        let mut index = start.paragraph;
        let mut line = start.line;

        'elements: while index < doc.len() {
            let el = &doc.elements[index];
            let measure = measure_element(el.kind, el.display_text());

            while line < measure.lines {
                let at_top = run.at_top();
                let lead = if line > 0 || at_top { 0 } else { measure.lead_in };
                let remaining = run.remaining();

                // keep-together rules, checked when the element enters a
                // page whole; at a page top they are either satisfied or
                // unsatisfiable, so only mid-page placements defer
                if line == 0 && !at_top {
                    if let Some(companion) = keep_requirement(doc, index) {
                        if remaining < lead + measure.lines + companion {
                            if !run.seal(LinePos::new(index, 0)) {
                                capped = true;
                                break 'elements;
                            }
                            continue;
                        }
                    }
                }

                let fit = remaining.saturating_sub(lead);
                let want = measure.lines - line;

                if fit >= want {
                    if line == 0 {
                        placements.push(Placement {
                            page: run.current_page(),
                            y_line: run.used + lead,
                        });
                    }
                    run.used += lead + want;
                    break;
                }

                // no room at all, or an unsplittable element mid-page:
                // push the rest of it to the next page
                if fit == 0 || (!el.kind.can_split_across_pages() && !at_top) {
                    if !run.seal(LinePos::new(index, line)) {
                        capped = true;
                        break 'elements;
                    }
                    continue;
                }

                // split at line granularity; the page comes out exactly
                // full. Unsplittable types reach here only when they open
                // a page and still overflow it.
                if line == 0 {
                    placements.push(Placement {
                        page: run.current_page(),
                        y_line: run.used + lead,
                    });
                }
                run.used += lead + fit;
                line += fit;
                if !run.seal(LinePos::new(index, line)) {
                    capped = true;
                    break 'elements;
                }
            }

            // a title-page run never shares its page with script content
            if self.metrics.break_after_title_page && el.kind == ElementType::TitlePage {
                if let Some(next) = doc.elements.get(index + 1) {
                    if next.kind != ElementType::TitlePage && !run.seal(LinePos::new(index + 1, 0))
                    {
                        capped = true;
                        break 'elements;
                    }
                }
            }

            index += 1;
            line = 0;
        }

        // close the final partial page; an empty document still gets one
        if !capped && (run.used > 0 || run.slices.is_empty()) {
            run.slices.push(PageSlice {
                start: run.page_start,
                end: LinePos::new(doc.len(), 0),
            });
        }

        RunOutput {
            slices: run.slices,
            placements,
            capped,
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PageMetrics::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::ScriptElement;

    fn metrics(lines_per_page: usize) -> PageMetrics {
        PageMetrics {
            lines_per_page,
            max_pages: 50,
            break_after_title_page: true,
        }
    }

    fn el(kind: ElementType, text: &str) -> ScriptElement {
        ScriptElement::new(kind, text)
    }

    /// Action text that wraps to exactly `lines` lines at width 60
    fn tall_action(lines: usize) -> ScriptElement {
        let word = "x".repeat(60);
        let text = vec![word; lines].join(" ");
        el(ElementType::Action, &text)
    }

    fn scenario_doc() -> ScriptDocument {
        ScriptDocument::from_elements(vec![
            el(ElementType::SceneHeading, "INT. HOUSE - DAY"),
            el(ElementType::Action, "He enters."),
            el(ElementType::Character, "JOHN"),
            el(ElementType::Dialogue, "Hello."),
        ])
    }

    /// Independent re-count of the lines a slice consumes, lead-ins
    /// included, for capacity assertions
    fn used_lines(doc: &ScriptDocument, slice: &PageSlice) -> usize {
        let mut total = 0;
        for idx in slice.paragraph_range() {
            let m = measure_element(doc.elements[idx].kind, doc.elements[idx].display_text());
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
            let opens_page = idx == slice.start.paragraph;
            if from == 0 && !opens_page {
                total += m.lead_in;
            }
            total += to - from;
        }
        total
    }

    #[test]
    fn test_scenario_fits_one_page_in_order() {
        let doc = scenario_doc();
        let map = Paginator::default().paginate(&doc);

        assert_eq!(map.page_count(), 1);
        assert!(!map.capped);
        assert_eq!(map.slices[0].start, LinePos::new(0, 0));
        assert_eq!(map.slices[0].end, LinePos::new(4, 0));
        assert_eq!(map.placements.len(), 4);
        for w in map.placements.windows(2) {
            assert!(w[0].y_line < w[1].y_line);
        }
    }

    #[test]
    fn test_lead_in_collapses_at_page_top() {
        let doc = scenario_doc();
        let map = Paginator::default().paginate(&doc);

        // the heading's two lead-in blanks vanish at the page top
        assert_eq!(map.placements[0].y_line, 0);
        // heading line + action's one lead-in blank
        assert_eq!(map.placements[1].y_line, 2);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let elements: Vec<ScriptElement> = (0..120)
            .map(|i| el(ElementType::Action, &format!("Action line {}.", i)))
            .collect();
        let doc = ScriptDocument::from_elements(elements);
        let map = Paginator::default().paginate(&doc);

        assert!(map.page_count() >= 3);
        for slice in &map.slices {
            assert!(used_lines(&doc, slice) <= 54);
        }
    }

    #[test]
    fn test_long_action_splits_across_pages() {
        let doc = ScriptDocument::from_elements(vec![tall_action(120)]);
        let map = Paginator::default().paginate(&doc);

        assert_eq!(map.page_count(), 3);
        assert_eq!(map.slices[0].end, LinePos::new(0, 54));
        assert_eq!(map.slices[1].start, LinePos::new(0, 54));
        assert_eq!(map.slices[1].end, LinePos::new(0, 108));
        assert_eq!(map.slices[2].end, LinePos::new(1, 0));
    }

    #[test]
    fn test_slices_are_contiguous() {
        let doc = ScriptDocument::from_elements(vec![
            tall_action(10),
            el(ElementType::SceneHeading, "EXT. STREET - DAY"),
            tall_action(7),
            el(ElementType::Character, "MAYA"),
            el(ElementType::Dialogue, "We should not be here."),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        assert_eq!(map.slices[0].start, LinePos::new(0, 0));
        for w in map.slices.windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
        assert_eq!(map.slices.last().unwrap().end, LinePos::new(doc.len(), 0));
    }

    #[test]
    fn test_heading_orphan_forced_to_next_page() {
        let doc = ScriptDocument::from_elements(vec![
            tall_action(5),
            el(ElementType::SceneHeading, "INT. CELLAR - NIGHT"),
            el(ElementType::Action, "Darkness."),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        // one line remained; the heading needs its height plus a following
        // line, so the page sealed before it
        assert_eq!(map.slices[0].end, LinePos::new(1, 0));
        assert_eq!(map.placements[1].page, 1);
        assert_eq!(map.placements[1].y_line, 0);
        // the heading is not alone: its action starts on the same page
        assert!(map.slices[1].contains_paragraph(2));
    }

    #[test]
    fn test_trailing_heading_may_sit_at_page_bottom() {
        // no content follows, so the keep-together rule does not apply
        let doc = ScriptDocument::from_elements(vec![
            tall_action(5),
            el(ElementType::SceneHeading, "INT. CELLAR - NIGHT"),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        // it still does not fit in the single remaining line (lead-in 2 +
        // heading 1), so it opens page two
        assert_eq!(map.placements[1].page, 1);
        assert_eq!(map.page_count(), 2);
    }

    #[test]
    fn test_character_cue_kept_with_dialogue() {
        let doc = ScriptDocument::from_elements(vec![
            tall_action(4),
            el(ElementType::Character, "JOHN"),
            el(ElementType::Dialogue, "I was never here. You understand?"),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        // the cue alone would fit in the two remaining lines, but not with
        // a dialogue line behind it
        assert_eq!(map.placements[1].page, 1);
        assert!(map.slices[1].contains_paragraph(2));
    }

    #[test]
    fn test_character_cue_without_dialogue_fills_page_bottom() {
        let doc = ScriptDocument::from_elements(vec![
            tall_action(4),
            el(ElementType::Character, "JOHN"),
            el(ElementType::Action, "He is gone."),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        // no dialogue follows, no rule: the cue stays on page one
        assert_eq!(map.placements[1].page, 0);
    }

    #[test]
    fn test_parenthetical_kept_with_dialogue() {
        let doc = ScriptDocument::from_elements(vec![
            tall_action(5),
            el(ElementType::Parenthetical, "(beat)"),
            el(ElementType::Dialogue, "Fine."),
        ]);
        let map = Paginator::new(metrics(6)).paginate(&doc);

        // one line remains and the parenthetical alone would fit there
        assert_eq!(map.placements[1].page, 1);
        assert!(map.slices[1].contains_paragraph(2));
    }

    #[test]
    fn test_title_page_seals_before_content() {
        let doc = ScriptDocument::from_elements(vec![
            el(ElementType::TitlePage, "THE LONG NIGHT"),
            el(ElementType::TitlePage, "by A. Writer"),
            el(ElementType::SceneHeading, "INT. HOUSE - DAY"),
            el(ElementType::Action, "He enters."),
        ]);
        let map = Paginator::default().paginate(&doc);

        assert_eq!(map.page_count(), 2);
        assert_eq!(map.slices[0].end, LinePos::new(2, 0));
        assert_eq!(map.placements[2].page, 1);
    }

    #[test]
    fn test_oversized_unsplittable_element_still_splits() {
        // a cue taller than the page cannot be kept whole; capacity wins
        let word = "X".repeat(38);
        let cue = vec![word; 5].join(" ");
        let doc = ScriptDocument::from_elements(vec![el(ElementType::Character, &cue)]);
        let map = Paginator::new(metrics(3)).paginate(&doc);

        assert_eq!(map.page_count(), 2);
        for slice in &map.slices {
            assert!(used_lines(&doc, slice) <= 3);
        }
    }

    #[test]
    fn test_page_cap_reported_not_fatal() {
        let elements: Vec<ScriptElement> = (0..10)
            .map(|i| el(ElementType::Action, &format!("a{}", i)))
            .collect();
        let doc = ScriptDocument::from_elements(elements);
        let map = Paginator::new(PageMetrics {
            lines_per_page: 2,
            max_pages: 2,
            break_after_title_page: true,
        })
        .paginate(&doc);

        assert!(map.capped);
        assert_eq!(map.page_count(), 2);
        assert!(map.placements.len() < doc.len());
    }

    #[test]
    fn test_empty_document_is_one_page() {
        let doc = ScriptDocument::new();
        let map = Paginator::default().paginate(&doc);
        assert_eq!(map.page_count(), 1);
        assert_eq!(map.slices[0].end, LinePos::new(1, 0));
    }

    #[test]
    fn test_incremental_matches_full_after_text_edit() {
        let mut elements = Vec::new();
        for i in 0..12 {
            elements.push(el(ElementType::SceneHeading, &format!("INT. ROOM {} - DAY", i)));
            elements.push(tall_action(3));
            elements.push(el(ElementType::Character, "DANA"));
            elements.push(el(ElementType::Dialogue, "Keep moving, keep quiet."));
        }
        let mut doc = ScriptDocument::from_elements(elements);
        let paginator = Paginator::new(metrics(8));
        let before = paginator.paginate(&doc);
        assert!(before.page_count() > 4);

        let dirty = 25;
        doc.element_mut(dirty).unwrap().text =
            "A much longer replacement line that changes how this paragraph wraps and pushes content."
                .to_string();
        doc.rebuild_ranges();

        let full = paginator.paginate(&doc);
        let incremental = paginator.paginate_from(&doc, &before, dirty);
        assert_eq!(incremental, full);
    }

    #[test]
    fn test_incremental_with_dirty_head_falls_back() {
        let doc = ScriptDocument::from_elements(vec![tall_action(4), tall_action(4)]);
        let paginator = Paginator::new(metrics(6));
        let before = paginator.paginate(&doc);
        let map = paginator.paginate_from(&doc, &before, 0);
        assert_eq!(map, paginator.paginate(&doc));
    }
}

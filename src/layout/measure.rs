//! Line measurement for pagination
//!
//! The paginator reasons in whole Courier lines on a fixed column grid,
//! never in glyph metrics. Measurement is a greedy word wrap at the element
//! type's column width: words pack onto a line while they fit, overlong
//! words hard-break at the width.

use crate::models::elements::ElementType;

/// Vertical extent of one element: lead-in blanks plus wrapped text lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementMeasure {
    /// Blank lines ahead of the element (collapsed when it opens a page)
    pub lead_in: usize,

    /// Wrapped content lines; empty text still occupies one line
    pub lines: usize,
}

impl ElementMeasure {
    /// Full height including lead-in
    pub fn total(&self) -> usize {
        self.lead_in + self.lines
    }
}

/// Measure an element's text at its type's column width
pub fn measure_element(kind: ElementType, text: &str) -> ElementMeasure {
    let style = kind.style();
    ElementMeasure {
        lead_in: style.blank_lines_before,
        lines: wrapped_line_count(text, style.width_cols),
    }
}

/// Number of lines `text` occupies when greedily word-wrapped at
/// `width_cols` columns. Empty (or all-whitespace) text is one line.
pub fn wrapped_line_count(text: &str, width_cols: usize) -> usize {
    let width = width_cols.max(1);
    let mut lines = 1usize;
    let mut col = 0usize;

    for word in text.split_whitespace() {
        let mut len = word.chars().count();

        if col > 0 {
            if col + 1 + len <= width {
                col += 1 + len;
                continue;
            }
            lines += 1;
        }

        // the word opens a fresh line; hard-break anything overlong
        while len > width {
            lines += 1;
            len -= width;
        }
        col = len;
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_one_line() {
        assert_eq!(wrapped_line_count("", 60), 1);
        assert_eq!(wrapped_line_count("   ", 60), 1);
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        assert_eq!(wrapped_line_count("He enters.", 60), 1);
    }

    #[test]
    fn test_greedy_word_wrap() {
        // "Hello" | "world foo" | "bar"
        assert_eq!(wrapped_line_count("Hello world foo bar", 10), 3);
    }

    #[test]
    fn test_word_exactly_at_width() {
        assert_eq!(wrapped_line_count("abcde fghij", 5), 2);
        assert_eq!(wrapped_line_count("abcde", 5), 1);
    }

    #[test]
    fn test_overlong_word_hard_breaks() {
        assert_eq!(wrapped_line_count("Supercalifragilistic", 10), 2);
        // a 120-char run at width 60 takes exactly two lines
        let long: String = std::iter::repeat('x').take(120).collect();
        assert_eq!(wrapped_line_count(&long, 60), 2);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        // five 2-byte chars fit a width of five columns
        assert_eq!(wrapped_line_count("ééééé", 5), 1);
        assert_eq!(wrapped_line_count("ééééé é", 5), 2);
    }

    #[test]
    fn test_measure_uses_type_width() {
        // dialogue wraps at 35 columns, action at 60
        let text = "I swear I had nothing to do with any of it, nothing at all.";
        let dialogue = measure_element(ElementType::Dialogue, text);
        let action = measure_element(ElementType::Action, text);
        assert!(dialogue.lines > action.lines);
        assert_eq!(action.lines, 1);
    }

    #[test]
    fn test_measure_includes_lead_in() {
        let m = measure_element(ElementType::SceneHeading, "INT. HOUSE - DAY");
        assert_eq!(m.lead_in, 2);
        assert_eq!(m.lines, 1);
        assert_eq!(m.total(), 3);

        let m = measure_element(ElementType::Dialogue, "Hello.");
        assert_eq!(m.lead_in, 0);
        assert_eq!(m.total(), 1);
    }
}

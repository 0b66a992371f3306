//! Plain-text classification
//!
//! Types untagged paragraphs on paste and import. These are screenplay
//! conventions, not a grammar: anything ambiguous falls back to Action,
//! which is always recoverable with Tab.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::elements::ElementType;

/// Slug-line openers: INT. / EXT. / EST. / INT./EXT. / I/E., followed by a
/// period or a space
static SCENE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(INT\.?/EXT|INT|EXT|EST|I/E)[. ]").unwrap());

/// Uppercase line ending in TO:
static TRANSITION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^a-z]*TO:$").unwrap());

/// Classify one line in isolation. Dialogue is invisible at this level: a
/// speech line reads like action without the cue above it, so callers with
/// surrounding context use [`classify_text`].
pub fn classify_line(text: &str) -> ElementType {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ElementType::Action;
    }
    if SCENE_HEADING.is_match(trimmed) {
        return ElementType::SceneHeading;
    }
    if TRANSITION.is_match(trimmed) {
        return ElementType::Transition;
    }
    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        return ElementType::Parenthetical;
    }
    if is_character_cue(trimmed) {
        return ElementType::Character;
    }
    ElementType::Action
}

/// Classify a block of pasted text into typed paragraphs.
///
/// Blank lines separate paragraphs and never become elements. Context
/// carries across lines: a cue is only a cue when content follows directly,
/// and plain lines inside a dialogue block are speech, not action.
pub fn classify_text(text: &str) -> Vec<(ElementType, String)> {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
    let mut out = Vec::new();
    let mut in_dialogue_block = false;

    for (i, raw) in lines.iter().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            in_dialogue_block = false;
            continue;
        }

        let mut kind = classify_line(trimmed);

        if kind == ElementType::Character {
            let followed = lines
                .get(i + 1)
                .map(|next| !next.trim().is_empty())
                .unwrap_or(false);
            if !followed {
                kind = ElementType::Action;
            }
        }
        if kind == ElementType::Action && in_dialogue_block {
            kind = ElementType::Dialogue;
        }

        in_dialogue_block = matches!(
            kind,
            ElementType::Character | ElementType::Parenthetical | ElementType::Dialogue
        );
        out.push((kind, trimmed.to_string()));
    }
    out
}

/// A cue is a short uppercase name, optionally with a trailing extension
/// like (V.O.), and never ends in a colon
fn is_character_cue(trimmed: &str) -> bool {
    let name = match trimmed.ends_with(')') {
        true => match trimmed.rfind('(') {
            Some(open) => trimmed[..open].trim_end(),
            None => return false,
        },
        false => trimmed,
    };
    if name.is_empty() || name.ends_with(':') {
        return false;
    }
    if name.chars().count() > ElementType::Character.style().width_cols {
        return false;
    }
    name.chars().any(|c| c.is_uppercase()) && !name.chars().any(|c| c.is_lowercase())
}

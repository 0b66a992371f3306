//! Scene-number allocation at document lock
//!
//! Runs once per lock transition. Unnumbered scene headings are given labels
//! that respect the interpolation order of `models::scene_number`:
//! sequential integers while the script is open-ended, letter suffixes when
//! squeezing between two locked numbers, letter prefixes when inserting
//! before the first numbered scene. Already-numbered and omitted headings
//! are never touched.

use std::collections::BTreeSet;

use crate::models::core::ScriptDocument;
use crate::models::scene_number::SceneNumber;

/// Outcome of one allocation pass
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationResult {
    /// (paragraph index, assigned label), in document order
    pub assigned: Vec<(usize, String)>,

    /// Count of gaps that admitted no strictly-between label and fell back
    /// to a uniqueness-only suffix extension
    pub fallbacks: usize,
}

/// A synthesized label plus whether the betweenness fallback was needed
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedLabel {
    pub label: String,
    pub used_fallback: bool,
}

/// Suffix ladder: `"" → A → B → … → Z → ZA → ZB → … → ZZ → ZZA`.
/// Strictly increasing in the plain lexicographic suffix order.
fn next_suffix(suffix: &str) -> String {
    match suffix.chars().last() {
        None => "A".to_string(),
        Some(c) if c < 'Z' => {
            let mut out = suffix[..suffix.len() - 1].to_string();
            out.push((c as u8 + 1) as char);
            out
        }
        Some(_) => format!("{}A", suffix),
    }
}

/// Synthesize a label for an unnumbered scene heading given its nearest
/// numbered neighbors and every label already in use.
///
/// The result is always disjoint from `used`. Between two neighbors the
/// label also sorts strictly between them whenever the gap allows it; an
/// unsubdividable gap (e.g. `12` followed by `12A`) extends the
/// predecessor's suffix until unique instead, keeping uniqueness at the
/// cost of betweenness.
pub fn interpolate(
    predecessor: Option<&str>,
    successor: Option<&str>,
    used: &BTreeSet<String>,
) -> InterpolatedLabel {
    let pred = predecessor.and_then(SceneNumber::parse);
    let succ = successor.and_then(SceneNumber::parse);

    match (pred, succ) {
        // Open end: continue the integer sequence past the predecessor
        (Some(p), None) => {
            let mut n = p.number.saturating_add(1);
            while used.contains(&n.to_string()) {
                n += 1;
            }
            InterpolatedLabel {
                label: n.to_string(),
                used_fallback: false,
            }
        }

        // Open start: prefix letters sort before the successor, longer
        // prefixes earlier, so A12, AA12, ... always leaves room
        (None, Some(s)) => {
            let mut prefix = "A".to_string();
            loop {
                let candidate = SceneNumber {
                    prefix: prefix.clone(),
                    number: s.number,
                    suffix: String::new(),
                };
                if candidate < s && !used.contains(&candidate.label()) {
                    return InterpolatedLabel {
                        label: candidate.label(),
                        used_fallback: false,
                    };
                }
                prefix.push('A');
            }
        }

        // Squeezed between two numbers: climb the suffix ladder from the
        // predecessor until an unused label fits before the successor
        (Some(p), Some(s)) => {
            let mut suffix = next_suffix(&p.suffix);
            loop {
                let candidate = SceneNumber {
                    prefix: p.prefix.clone(),
                    number: p.number,
                    suffix: suffix.clone(),
                };
                if candidate >= s {
                    break;
                }
                if !used.contains(&candidate.label()) {
                    return InterpolatedLabel {
                        label: candidate.label(),
                        used_fallback: false,
                    };
                }
                suffix = next_suffix(&suffix);
            }
            // Unsubdividable gap. Extend the predecessor's label until
            // unique; ordering past the successor is accepted.
            let mut label = format!("{}A", p.label());
            while used.contains(&label) {
                label.push('A');
            }
            InterpolatedLabel {
                label,
                used_fallback: true,
            }
        }

        // No numbered scene anywhere yet: start the integer sequence
        (None, None) => {
            let mut n = 1u32;
            while used.contains(&n.to_string()) {
                n += 1;
            }
            InterpolatedLabel {
                label: n.to_string(),
                used_fallback: false,
            }
        }
    }
}

/// Assign labels to every unnumbered, non-omitted scene heading.
///
/// Headings are processed in document order and each assignment immediately
/// joins the used set, so a run of fresh headings numbers sequentially.
pub fn allocate_scene_numbers(doc: &mut ScriptDocument) -> AllocationResult {
    let mut used: BTreeSet<String> = doc.used_scene_numbers().into_iter().collect();
    let headings: Vec<usize> = doc.scene_headings().map(|(i, _)| i).collect();

    let mut assigned = Vec::new();
    let mut fallbacks = 0;

    for pos in 0..headings.len() {
        let idx = headings[pos];
        if doc.elements[idx].scene_number.is_some() || doc.elements[idx].is_omitted {
            continue;
        }

        let predecessor = headings[..pos]
            .iter()
            .rev()
            .find_map(|&j| doc.elements[j].scene_number.clone());
        let successor = headings[pos + 1..]
            .iter()
            .find_map(|&j| doc.elements[j].scene_number.clone());

        let result = interpolate(predecessor.as_deref(), successor.as_deref(), &used);
        if result.used_fallback {
            fallbacks += 1;
            log::warn!(
                "scene gap after {:?} is full; assigned fallback label {}",
                predecessor,
                result.label
            );
        }
        used.insert(result.label.clone());
        doc.elements[idx].scene_number = Some(result.label.clone());
        assigned.push((idx, result.label));
    }

    AllocationResult {
        assigned,
        fallbacks,
    }
}

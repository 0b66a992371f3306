//! Element types and formatting tables for screenplay paragraphs
//!
//! This module defines the closed set of paragraph element types, the
//! revision-color palette, and the per-type formatting/transition tables
//! consumed by the transition engine and the paginator. The tables are plain
//! configuration data, not derived logic.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Enumeration of all paragraph element types in a screenplay document
#[wasm_bindgen]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    /// Scene heading / slugline ("INT. HOUSE - DAY")
    SceneHeading = 0,

    /// Action / description lines
    Action = 1,

    /// Character cue above dialogue ("JOHN")
    Character = 2,

    /// Spoken dialogue
    Dialogue = 3,

    /// Actor direction inside a dialogue block ("(beat)")
    Parenthetical = 4,

    /// Editing transition ("CUT TO:")
    Transition = 5,

    /// Shot heading ("CLOSE ON the letter")
    Shot = 6,

    /// Untyped general text
    General = 7,

    /// Title-page lines (title, byline, contact block)
    TitlePage = 8,
}

// Custom serialization to show both name and value
impl Serialize for ElementType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ElementType", 2)?;
        state.serialize_field("name", &self.snake_case_name())?;
        state.serialize_field("value", &(*self as u8))?;
        state.end()
    }
}

// Custom deserialization - accepts number, name string, or object format.
// Unrecognized input degrades to Action so a load never fails on a bad type.
impl<'de> Deserialize<'de> for ElementType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ElementTypeVisitor;

        impl<'de> serde::de::Visitor<'de> for ElementTypeVisitor {
            type Value = ElementType;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an ElementType number, name, or object")
            }

            fn visit_u64<E>(self, value: u64) -> Result<ElementType, E>
            where
                E: serde::de::Error,
            {
                Ok(ElementType::from_value(value as u8))
            }

            fn visit_i64<E>(self, value: i64) -> Result<ElementType, E>
            where
                E: serde::de::Error,
            {
                self.visit_u64(value as u64)
            }

            fn visit_str<E>(self, value: &str) -> Result<ElementType, E>
            where
                E: serde::de::Error,
            {
                Ok(ElementType::from_name(value).unwrap_or_default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<ElementType, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut value: Option<u8> = None;
                let mut name: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "value" => value = Some(map.next_value()?),
                        "name" => name = Some(map.next_value()?),
                        _ => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }
                match (value, name) {
                    (Some(v), _) => Ok(ElementType::from_value(v)),
                    (None, Some(n)) => Ok(ElementType::from_name(&n).unwrap_or_default()),
                    (None, None) => Ok(ElementType::default()),
                }
            }
        }

        deserializer.deserialize_any(ElementTypeVisitor)
    }
}

impl ElementType {
    /// All element types in table order
    pub const ALL: [ElementType; 9] = [
        ElementType::SceneHeading,
        ElementType::Action,
        ElementType::Character,
        ElementType::Dialogue,
        ElementType::Parenthetical,
        ElementType::Transition,
        ElementType::Shot,
        ElementType::General,
        ElementType::TitlePage,
    ];

    /// Convert a raw discriminant; anything out of range becomes Action
    pub fn from_value(value: u8) -> Self {
        match value {
            0 => ElementType::SceneHeading,
            1 => ElementType::Action,
            2 => ElementType::Character,
            3 => ElementType::Dialogue,
            4 => ElementType::Parenthetical,
            5 => ElementType::Transition,
            6 => ElementType::Shot,
            7 => ElementType::General,
            8 => ElementType::TitlePage,
            _ => ElementType::Action,
        }
    }

    /// Parse a snake_case or camelCase name (as exchanged with hosts)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "scene_heading" | "sceneHeading" => Some(ElementType::SceneHeading),
            "action" => Some(ElementType::Action),
            "character" => Some(ElementType::Character),
            "dialogue" => Some(ElementType::Dialogue),
            "parenthetical" => Some(ElementType::Parenthetical),
            "transition" => Some(ElementType::Transition),
            "shot" => Some(ElementType::Shot),
            "general" => Some(ElementType::General),
            "title_page" | "titlePage" => Some(ElementType::TitlePage),
            _ => None,
        }
    }

    /// Get a human-readable name for this element type
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "Scene Heading",
            ElementType::Action => "Action",
            ElementType::Character => "Character",
            ElementType::Dialogue => "Dialogue",
            ElementType::Parenthetical => "Parenthetical",
            ElementType::Transition => "Transition",
            ElementType::Shot => "Shot",
            ElementType::General => "General",
            ElementType::TitlePage => "Title Page",
        }
    }

    /// Get snake_case name for JSON serialization
    pub fn snake_case_name(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "scene_heading",
            ElementType::Action => "action",
            ElementType::Character => "character",
            ElementType::Dialogue => "dialogue",
            ElementType::Parenthetical => "parenthetical",
            ElementType::Transition => "transition",
            ElementType::Shot => "shot",
            ElementType::General => "general",
            ElementType::TitlePage => "title_page",
        }
    }

    /// Formatting/transition table entry for this type
    pub fn style(&self) -> &'static ElementStyle {
        &STYLES[*self as usize]
    }

    /// Whether this type renders in uppercase
    pub fn needs_uppercase(&self) -> bool {
        self.style().all_caps
    }

    /// Whether this type is part of a dialogue block (cue, speech, directions)
    pub fn is_dialogue_block(&self) -> bool {
        matches!(
            self,
            ElementType::Character | ElementType::Dialogue | ElementType::Parenthetical
        )
    }

    /// Whether a page may break in the middle of this element's lines
    pub fn can_split_across_pages(&self) -> bool {
        !matches!(
            self,
            ElementType::SceneHeading | ElementType::Character | ElementType::Parenthetical
        )
    }
}

impl Default for ElementType {
    fn default() -> Self {
        ElementType::Action
    }
}

/// Production revision colors in override-priority order.
///
/// The palette index is the priority: a paragraph's recorded color is only
/// replaced by a strictly higher-priority color, never downgraded. White is
/// "no revision" (priority 0).
#[wasm_bindgen]
#[repr(u8)]
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde_repr::Serialize_repr,
    serde_repr::Deserialize_repr,
)]
pub enum RevisionColor {
    White = 0,
    Blue = 1,
    Pink = 2,
    Yellow = 3,
    Green = 4,
    Goldenrod = 5,
    Buff = 6,
    Salmon = 7,
    Cherry = 8,
    Tan = 9,
    Gray = 10,
}

impl RevisionColor {
    /// Override priority (palette index)
    pub fn priority(&self) -> u8 {
        *self as u8
    }

    /// Whether this color marks an actual revision pass
    pub fn is_revision(&self) -> bool {
        !matches!(self, RevisionColor::White)
    }

    /// Parse a color name; unknown names count as White (priority 0)
    pub fn parse_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "white" => RevisionColor::White,
            "blue" => RevisionColor::Blue,
            "pink" => RevisionColor::Pink,
            "yellow" => RevisionColor::Yellow,
            "green" => RevisionColor::Green,
            "goldenrod" => RevisionColor::Goldenrod,
            "buff" => RevisionColor::Buff,
            "salmon" => RevisionColor::Salmon,
            "cherry" => RevisionColor::Cherry,
            "tan" => RevisionColor::Tan,
            "gray" | "grey" => RevisionColor::Gray,
            _ => RevisionColor::White,
        }
    }

    /// Get a human-readable name for this color
    pub fn name(&self) -> &'static str {
        match self {
            RevisionColor::White => "White",
            RevisionColor::Blue => "Blue",
            RevisionColor::Pink => "Pink",
            RevisionColor::Yellow => "Yellow",
            RevisionColor::Green => "Green",
            RevisionColor::Goldenrod => "Goldenrod",
            RevisionColor::Buff => "Buff",
            RevisionColor::Salmon => "Salmon",
            RevisionColor::Cherry => "Cherry",
            RevisionColor::Tan => "Tan",
            RevisionColor::Gray => "Gray",
        }
    }
}

impl Default for RevisionColor {
    fn default() -> Self {
        RevisionColor::White
    }
}

/// Horizontal alignment within the element's column box
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Left
    }
}

/// Formatting geometry and transition targets for one element type.
///
/// Columns are on the 10-pitch Courier grid of a US-letter script page: the
/// content box runs from the 1.5in left margin to the 7.5in right margin,
/// 60 columns wide. Vertical space is whole lines at 6 lines per inch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementStyle {
    /// Element type this entry describes
    pub kind: ElementType,

    /// Left indent in columns from the content-box left edge
    pub left_col: usize,

    /// Maximum columns per wrapped line
    pub width_cols: usize,

    /// Horizontal alignment inside the column box
    pub align: Alignment,

    /// Uppercase transform on reclassification and typing
    pub all_caps: bool,

    /// Blank lines inserted ahead of the element (collapsed at page top)
    pub blank_lines_before: usize,

    /// Type created by Enter on a non-empty paragraph
    pub next_on_content: ElementType,

    /// Type this paragraph becomes on Enter while already empty
    pub next_on_empty: ElementType,

    /// Ring traversed by Tab / Shift-Tab
    pub tab_cycle: &'static [ElementType],
}

/// Tab ring shared by the screenplay element types
pub const SCRIPT_TAB_CYCLE: [ElementType; 8] = [
    ElementType::SceneHeading,
    ElementType::Action,
    ElementType::Character,
    ElementType::Dialogue,
    ElementType::Parenthetical,
    ElementType::Transition,
    ElementType::Shot,
    ElementType::General,
];

/// Title-page lines cycle only to themselves
pub const TITLE_TAB_CYCLE: [ElementType; 1] = [ElementType::TitlePage];

/// The formatting/transition table, indexed by `ElementType` discriminant
pub const STYLES: [ElementStyle; 9] = [
    ElementStyle {
        kind: ElementType::SceneHeading,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Left,
        all_caps: true,
        blank_lines_before: 2,
        next_on_content: ElementType::Action,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Action,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Left,
        all_caps: false,
        blank_lines_before: 1,
        next_on_content: ElementType::Character,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Character,
        left_col: 22,
        width_cols: 38,
        align: Alignment::Left,
        all_caps: true,
        blank_lines_before: 1,
        next_on_content: ElementType::Dialogue,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Dialogue,
        left_col: 10,
        width_cols: 35,
        align: Alignment::Left,
        all_caps: false,
        blank_lines_before: 0,
        next_on_content: ElementType::Character,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Parenthetical,
        left_col: 16,
        width_cols: 25,
        align: Alignment::Left,
        all_caps: false,
        blank_lines_before: 0,
        next_on_content: ElementType::Dialogue,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Transition,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Right,
        all_caps: true,
        blank_lines_before: 1,
        next_on_content: ElementType::SceneHeading,
        next_on_empty: ElementType::SceneHeading,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::Shot,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Left,
        all_caps: true,
        blank_lines_before: 1,
        next_on_content: ElementType::Action,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::General,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Left,
        all_caps: false,
        blank_lines_before: 1,
        next_on_content: ElementType::General,
        next_on_empty: ElementType::Action,
        tab_cycle: &SCRIPT_TAB_CYCLE,
    },
    ElementStyle {
        kind: ElementType::TitlePage,
        left_col: 0,
        width_cols: 60,
        align: Alignment::Center,
        all_caps: false,
        blank_lines_before: 0,
        next_on_content: ElementType::TitlePage,
        next_on_empty: ElementType::Action,
        tab_cycle: &TITLE_TAB_CYCLE,
    },
];

//! Turns ranked matches into display verses and the context block fed to the
//! answer prompt.

use verse_store::RankedMatch;

use crate::api_types::DisplayVerse;

/// Longest verse text (in characters) shown or sent to the model.
pub const MAX_VERSE_CHARS: usize = 500;
const ELLIPSIS: &str = "...";
const UNKNOWN: &str = "Unknown";

/// Display verses plus the textual context block.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledContext {
    pub verses: Vec<DisplayVerse>,
    pub context_block: String,
}

/// Builds display verses (same order as `matches`) and the context block:
///
/// ```text
/// Question: <query>
///
/// Relevant verses:
/// Chapter <c>, Verse <v>: <text>
/// ```
///
/// No verse is dropped; missing chapter/verse labels render as `Unknown`.
pub fn assemble(query: &str, matches: &[RankedMatch]) -> AssembledContext {
    let verses: Vec<DisplayVerse> = matches.iter().map(display_verse).collect();

    let mut context_block = format!("Question: {query}\n\nRelevant verses:\n");
    for v in &verses {
        context_block.push_str(&format!(
            "Chapter {}, Verse {}: {}\n",
            v.chapter, v.verse, v.text
        ));
    }

    AssembledContext {
        verses,
        context_block,
    }
}

fn display_verse(m: &RankedMatch) -> DisplayVerse {
    let p = &m.passage;
    DisplayVerse {
        chapter: p.chapter_number.clone().unwrap_or_else(|| UNKNOWN.into()),
        verse: p.verse_number.clone().unwrap_or_else(|| UNKNOWN.into()),
        text: truncate_verse(&p.text),
        similarity: similarity_percent(m.distance),
    }
}

/// Cuts `text` to [`MAX_VERSE_CHARS`] characters and appends `...` when it was longer.
pub fn truncate_verse(text: &str) -> String {
    match text.char_indices().nth(MAX_VERSE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// `round((1 - distance) * 100, 1)`. Distances outside `[0, 1]` give values
/// outside `[0, 100]`.
///
/// Rounds the exact binary value to one decimal, ties to even.
pub fn similarity_percent(distance: f64) -> f64 {
    let x = (1.0 - distance) * 100.0;
    format!("{x:.1}").parse().unwrap_or(x)
}

//! Core data models used by the library.

use serde_json::Value;

/// One indexed verse as stored in the point payload
/// (`text`, `chapter_number`, `verse_number`, `source`).
///
/// Chapter and verse are opaque labels: numeric payload values are kept as
/// their decimal text, empty or missing values become `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Passage {
    pub text: String,
    pub chapter_number: Option<String>,
    pub verse_number: Option<String>,
    pub source_tag: Option<String>,
}

impl Passage {
    /// Maps a JSON payload onto a passage. Never fails: a payload without
    /// `text` yields an empty text.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            text: label(payload.get("text")).unwrap_or_default(),
            chapter_number: label(payload.get("chapter_number")),
            verse_number: label(payload.get("verse_number")),
            source_tag: label(payload.get("source")),
        }
    }
}

/// A passage with its distance to the query (lower is more similar).
#[derive(Clone, Debug, PartialEq)]
pub struct RankedMatch {
    pub passage: Passage,
    pub distance: f64,
}

fn label(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_labels_become_text() {
        let p = Passage::from_payload(&json!({
            "text": "You have a right to your actions",
            "chapter_number": 2,
            "verse_number": "47",
            "source": "gita"
        }));
        assert_eq!(p.chapter_number.as_deref(), Some("2"));
        assert_eq!(p.verse_number.as_deref(), Some("47"));
        assert_eq!(p.source_tag.as_deref(), Some("gita"));
    }

    #[test]
    fn empty_or_missing_labels_are_none() {
        let p = Passage::from_payload(&json!({ "chapter_number": "", "verse_number": null }));
        assert_eq!(p.text, "");
        assert_eq!(p.chapter_number, None);
        assert_eq!(p.verse_number, None);
        assert_eq!(p.source_tag, None);
    }
}

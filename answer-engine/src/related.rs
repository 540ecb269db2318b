//! Best-effort parsing of the related-questions completion.

use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_LINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s*(.*)$").ok());

/// Extracts follow-up questions from free text.
///
/// Numbered lines (`1. ...`) win; their text is trimmed and empty entries are
/// skipped. Without any numbered line every non-blank line is taken, with
/// leading/trailing `-` and spaces removed. The count is not capped.
///
/// ```
/// use answer_engine::related::parse_related_questions;
/// assert_eq!(parse_related_questions("1. A\n2. B"), ["A", "B"]);
/// assert_eq!(parse_related_questions("- A\n- B"), ["A", "B"]);
/// assert!(parse_related_questions("").is_empty());
/// ```
pub fn parse_related_questions(raw: &str) -> Vec<String> {
    if let Some(re) = NUMBERED_LINE.as_ref() {
        let numbered: Vec<String> = re
            .captures_iter(raw)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !numbered.is_empty() {
            return numbered;
        }
    }

    raw.lines()
        .map(|line| line.trim_matches(|c| c == '-' || c == ' ').trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::Serialize;

/// Default number of verses retrieved per question.
pub const DEFAULT_NUM_VERSES: u64 = 3;

/// One question and how many verses to ground it in.
///
/// # Example
/// ```
/// use answer_engine::QueryRequest;
/// let req = QueryRequest::new("What is karma yoga?");
/// assert_eq!(req.num_verses, 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    pub query: String,
    pub num_verses: u64,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            num_verses: DEFAULT_NUM_VERSES,
        }
    }
}

/// A retrieved verse shaped for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayVerse {
    pub chapter: String,
    pub verse: String,
    /// At most 500 characters of the verse, plus `...` when cut.
    pub text: String,
    /// `(1 - distance) * 100`, one decimal place.
    pub similarity: f64,
}

/// Final payload: the answer, the verses it was grounded in (rank order) and
/// suggested follow-up questions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub ai_response: String,
    pub verses: Vec<DisplayVerse>,
    pub related_questions: Vec<String>,
}

use answer_engine::{DEFAULT_NUM_VERSES, QueryRequest};
use serde::Deserialize;

use crate::error_handler::AppError;

/// Request payload for `POST /api/query`.
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    /// Natural language question.
    pub query: String,
    /// How many verses to retrieve (default 3).
    #[serde(default, alias = "numVerses")]
    pub num_verses: Option<u64>,
}

impl TryFrom<QueryBody> for QueryRequest {
    type Error = AppError;

    fn try_from(body: QueryBody) -> Result<Self, Self::Error> {
        if body.query.trim().is_empty() {
            return Err(AppError::BadRequest("field `query` must not be empty".into()));
        }
        Ok(QueryRequest {
            query: body.query,
            num_verses: body.num_verses.unwrap_or(DEFAULT_NUM_VERSES),
        })
    }
}

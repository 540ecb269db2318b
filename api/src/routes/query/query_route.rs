//! POST /api/query — answers a question from retrieved verses.

use std::sync::Arc;

use answer_engine::{QueryRequest, QueryResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use tracing::{debug, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::query::query_request::QueryBody,
};

/// Handler: POST /api/query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8001/api/query \
///   -H 'content-type: application/json' \
///   -d '{"query":"What does Krishna say about duty?","num_verses":3}'
/// ```
#[instrument(name = "query_route", skip_all)]
pub async fn query_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<QueryBody>, JsonRejection>,
) -> AppResult<Json<QueryResponse>> {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let Json(body) = payload?;
    let req = QueryRequest::try_from(body)?;
    info!(num_verses = req.num_verses, query_len = req.query.len(), "query received");

    let response = state.engine.answer(&req).await?;
    Ok(Json(response))
}

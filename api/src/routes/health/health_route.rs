use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Handler: GET /api/health. Liveness only; it does not probe the index or the LLM.
pub async fn health_route() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "GITA-GPT API is running",
    })
}

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use ai_llm_service::{AiLlmError, GenerationParams};
use answer_engine::{AnswerEngine, EngineConfig, EngineDeps, TextGenerator};
use api::{AppState, router};
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use verse_store::{BoxFuture, Passage, RankedMatch, StoreError, VerseIndex};

struct OneVerseIndex;

impl VerseIndex for OneVerseIndex {
    fn search<'a>(
        &'a self,
        _query_text: &'a str,
        k: u64,
    ) -> BoxFuture<'a, Result<Vec<RankedMatch>, StoreError>> {
        let out = if k == 0 {
            Vec::new()
        } else {
            vec![RankedMatch {
                passage: Passage {
                    text: "Set thy heart upon thy work, but never on its reward.".into(),
                    chapter_number: Some("2".into()),
                    verse_number: Some("47".into()),
                    source_tag: Some("gita".into()),
                },
                distance: 0.25,
            }]
        };
        Box::pin(async move { Ok(out) })
    }
}

#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
    fail_with_status: Option<&'static str>,
}

impl TextGenerator for CountingGenerator {
    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
        _params: GenerationParams,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let out = match self.fail_with_status {
            Some(text) => Err(AiLlmError::Connection(text.to_string())),
            None if n == 0 => Ok("**Act** without attachment.".to_string()),
            None => Ok("1. What is karma?\n2. What is detachment?\n3. Who is Krishna?".to_string()),
        };
        Box::pin(async move { out })
    }
}

fn app(index: Option<Arc<dyn VerseIndex>>, generator: Arc<CountingGenerator>) -> axum::Router {
    let engine = AnswerEngine::new(
        EngineDeps { index, generator },
        EngineConfig::default(),
    );
    router(Arc::new(AppState::new(engine)))
}

fn post_query(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn answers_with_verses_and_related_questions() {
    let generator = Arc::new(CountingGenerator::default());
    let res = app(Some(Arc::new(OneVerseIndex)), generator.clone())
        .oneshot(post_query(json!({ "query": "What is my duty?" })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["query"], "What is my duty?");
    assert_eq!(body["ai_response"], "**Act** without attachment.");
    assert_eq!(body["verses"][0]["chapter"], "2");
    assert_eq!(body["verses"][0]["verse"], "47");
    assert_eq!(body["verses"][0]["similarity"], 75.0);
    assert_eq!(body["related_questions"].as_array().unwrap().len(), 3);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn missing_index_is_503_without_generation() {
    let generator = Arc::new(CountingGenerator::default());
    let res = app(None, generator.clone())
        .oneshot(post_query(json!({ "query": "What is my duty?" })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(res.headers().get(header::RETRY_AFTER).is_none());
    let body = json_body(res).await;
    assert_eq!(body["error_type"], "database_unavailable");
    assert_eq!(body["retry_after"], 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_failure_is_classified_500() {
    let generator = Arc::new(CountingGenerator {
        fail_with_status: Some("tcp connect refused"),
        ..Default::default()
    });
    let res = app(Some(Arc::new(OneVerseIndex)), generator)
        .oneshot(post_query(json!({ "query": "q", "num_verses": 1 })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.headers()[header::RETRY_AFTER], "30");
    let body = json_body(res).await;
    assert_eq!(body["error_type"], "network_error");
    assert!(body["user_message"].as_str().unwrap().starts_with('🌐'));
}

#[tokio::test]
async fn zero_verses_still_answers() {
    let generator = Arc::new(CountingGenerator::default());
    let res = app(Some(Arc::new(OneVerseIndex)), generator.clone())
        .oneshot(post_query(json!({ "query": "q", "numVerses": 0 })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert!(body["verses"].as_array().unwrap().is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_query_is_400() {
    let generator = Arc::new(CountingGenerator::default());
    let res = app(Some(Arc::new(OneVerseIndex)), generator.clone())
        .oneshot(post_query(json!({ "query": "   " })))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"], "BAD_REQUEST");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let generator = Arc::new(CountingGenerator::default());
    let req = Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"query\": "))
        .unwrap();
    let res = app(Some(Arc::new(OneVerseIndex)), generator)
        .oneshot(req)
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_running() {
    let res = app(None, Arc::new(CountingGenerator::default()))
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({ "status": "healthy", "message": "GITA-GPT API is running" })
    );
}

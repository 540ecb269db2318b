//! Request orchestration: retrieve, assemble, answer, suggest follow-ups.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use verse_store::VerseIndex;

use crate::api_types::{QueryRequest, QueryResponse};
use crate::assemble::assemble;
use crate::cfg::EngineConfig;
use crate::classify::{ClassifiedError, classify};
use crate::error::EngineError;
use crate::generation::TextGenerator;
use crate::prompt::{answer_prompt, related_questions_prompt};
use crate::related::parse_related_questions;

/// Steps of one request, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    CheckIndexAvailable,
    Retrieve,
    AssembleContext,
    GenerateAnswer,
    GenerateRelatedQuestions,
    ParseRelated,
}

/// Process-wide collaborators, established once at startup.
#[derive(Clone)]
pub struct EngineDeps {
    /// `None` when the verse index could not be bound.
    pub index: Option<Arc<dyn VerseIndex>>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Answers questions from retrieved verses. Holds no per-request state.
#[derive(Clone)]
pub struct AnswerEngine {
    deps: EngineDeps,
    cfg: EngineConfig,
}

impl AnswerEngine {
    pub fn new(deps: EngineDeps, cfg: EngineConfig) -> Self {
        Self { deps, cfg }
    }

    /// Runs one question through the pipeline.
    ///
    /// Steps run strictly in sequence; the first failure is classified and
    /// returned. Without a bound index the call fails with
    /// `DatabaseUnavailable` before any remote call.
    pub async fn answer(&self, req: &QueryRequest) -> Result<QueryResponse, ClassifiedError> {
        let span = info_span!("answer", num_verses = req.num_verses, query_len = req.query.len());
        self.run(req).instrument(span).await
    }

    async fn run(&self, req: &QueryRequest) -> Result<QueryResponse, ClassifiedError> {
        debug!(stage = ?Stage::CheckIndexAvailable);
        let Some(index) = self.deps.index.as_ref() else {
            let err = ClassifiedError::database_unavailable();
            warn!(stage = ?Stage::CheckIndexAvailable, error_type = ?err.error_type, "no verse index bound");
            return Err(err);
        };

        debug!(stage = ?Stage::Retrieve);
        let matches = index
            .search(&req.query, req.num_verses)
            .await
            .map_err(|e| fail(Stage::Retrieve, EngineError::from(e)))?;

        debug!(stage = ?Stage::AssembleContext, matches = matches.len());
        let ctx = assemble(&req.query, &matches);

        debug!(stage = ?Stage::GenerateAnswer);
        let prompt = answer_prompt(&req.query, &ctx.context_block);
        let ai_response = self
            .deps
            .generator
            .complete(&prompt, self.cfg.answer)
            .await
            .map_err(|e| fail(Stage::GenerateAnswer, EngineError::from(e)))?;

        debug!(stage = ?Stage::GenerateRelatedQuestions, answer_len = ai_response.len());
        let prompt = related_questions_prompt(&req.query, &ai_response);
        let related_raw = self
            .deps
            .generator
            .complete(&prompt, self.cfg.related)
            .await
            .map_err(|e| fail(Stage::GenerateRelatedQuestions, EngineError::from(e)))?;

        debug!(stage = ?Stage::ParseRelated);
        let related_questions = parse_related_questions(&related_raw);

        info!(
            verses = ctx.verses.len(),
            related = related_questions.len(),
            "answer ready"
        );

        Ok(QueryResponse {
            query: req.query.clone(),
            ai_response,
            verses: ctx.verses,
            related_questions,
        })
    }
}

fn fail(stage: Stage, err: EngineError) -> ClassifiedError {
    let classified = classify(&err);
    warn!(?stage, error_type = ?classified.error_type, error = %err, "pipeline step failed");
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ai_llm_service::{AiLlmError, GenerationParams};
    use verse_store::{BoxFuture, Passage, RankedMatch, StoreError};

    use crate::classify::ErrorType;

    struct FixedIndex {
        calls: AtomicUsize,
        matches: Vec<RankedMatch>,
    }

    impl VerseIndex for FixedIndex {
        fn search<'a>(
            &'a self,
            _query_text: &'a str,
            k: u64,
        ) -> BoxFuture<'a, Result<Vec<RankedMatch>, StoreError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let out = self.matches.iter().take(k as usize).cloned().collect();
            Box::pin(async move { Ok(out) })
        }
    }

    struct FailingIndex;

    impl VerseIndex for FailingIndex {
        fn search<'a>(
            &'a self,
            _query_text: &'a str,
            _k: u64,
        ) -> BoxFuture<'a, Result<Vec<RankedMatch>, StoreError>> {
            Box::pin(async { Err(StoreError::Qdrant("transport error: Connection refused".into())) })
        }
    }

    /// Replies with `answer` first, then `related`; records prompts and params.
    struct ScriptedGenerator {
        answer: Result<String, fn() -> AiLlmError>,
        related: String,
        calls: AtomicUsize,
        seen: Mutex<Vec<(String, GenerationParams)>>,
    }

    impl ScriptedGenerator {
        fn ok(answer: &str, related: &str) -> Self {
            Self {
                answer: Ok(answer.into()),
                related: related.into(),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(make: fn() -> AiLlmError) -> Self {
            Self {
                answer: Err(make),
                ..Self::ok("", "")
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn complete<'a>(
            &'a self,
            prompt: &'a str,
            params: GenerationParams,
        ) -> BoxFuture<'a, Result<String, AiLlmError>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((prompt.to_string(), params));
            let out = match (n % 2, &self.answer) {
                (0, Ok(a)) => Ok(a.clone()),
                (0, Err(make)) => Err(make()),
                _ => Ok(self.related.clone()),
            };
            Box::pin(async move { out })
        }
    }

    fn verse(ch: &str, v: &str, text: &str, distance: f64) -> RankedMatch {
        RankedMatch {
            passage: Passage {
                text: text.into(),
                chapter_number: Some(ch.into()),
                verse_number: Some(v.into()),
                source_tag: Some("gita".into()),
            },
            distance,
        }
    }

    fn index() -> Arc<FixedIndex> {
        Arc::new(FixedIndex {
            calls: AtomicUsize::new(0),
            matches: vec![
                verse("2", "47", "You have a right to perform your duty", 0.18),
                verse("3", "19", "Do your work without attachment", 0.25),
                verse("6", "5", "Lift yourself by yourself", 0.31),
            ],
        })
    }

    fn engine(index: Option<Arc<dyn VerseIndex>>, generator: Arc<dyn TextGenerator>) -> AnswerEngine {
        AnswerEngine::new(EngineDeps { index, generator }, EngineConfig::default())
    }

    #[tokio::test]
    async fn full_answer_shape() {
        let generator = Arc::new(ScriptedGenerator::ok(
            "**Duty** matters.",
            "1. What is nishkama karma?\n2. Who is Arjuna?\n3. What is yoga?",
        ));
        let e = engine(Some(index()), generator.clone());

        let out = e.answer(&QueryRequest::new("What is duty?")).await.unwrap();

        assert_eq!(out.query, "What is duty?");
        assert_eq!(out.ai_response, "**Duty** matters.");
        assert_eq!(out.verses.len(), 3);
        assert_eq!(out.verses[0].chapter, "2");
        assert_eq!(out.verses[0].similarity, 82.0);
        assert_eq!(out.related_questions.len(), 3);

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, GenerationParams::new(0.5, 1024));
        assert_eq!(seen[1].1, GenerationParams::new(0.7, 256));
        assert!(seen[0].0.contains("Chapter 2, Verse 47: You have a right"));
        assert!(seen[1].0.contains("Answer: **Duty** matters."));
    }

    #[tokio::test]
    async fn missing_index_fails_before_generation() {
        let generator = Arc::new(ScriptedGenerator::ok("a", "b"));
        let e = engine(None, generator.clone());

        let err = e.answer(&QueryRequest::new("q")).await.unwrap_err();

        assert_eq!(err.error_type, ErrorType::DatabaseUnavailable);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_verses_still_calls_generator_twice() {
        let generator = Arc::new(ScriptedGenerator::ok("a", "1. b"));
        let e = engine(Some(index()), generator.clone());

        let req = QueryRequest {
            query: "q".into(),
            num_verses: 0,
        };
        let out = e.answer(&req).await.unwrap();

        assert!(out.verses.is_empty());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        let seen = generator.seen.lock().unwrap();
        assert!(seen[0].0.contains("Question: q\n\nRelevant verses:\n\n"));
    }

    #[tokio::test]
    async fn generation_error_is_classified() {
        let generator = Arc::new(ScriptedGenerator::failing(|| {
            AiLlmError::Timeout(std::time::Duration::from_secs(60))
        }));
        let e = engine(Some(index()), generator.clone());

        let err = e.answer(&QueryRequest::new("q")).await.unwrap_err();

        assert_eq!(err.error_type, ErrorType::NetworkError);
        assert_eq!(err.retry_after_secs, 30);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retrieval_error_is_classified() {
        let generator = Arc::new(ScriptedGenerator::ok("a", "b"));
        let e = engine(Some(Arc::new(FailingIndex)), generator.clone());

        let err = e.answer(&QueryRequest::new("q")).await.unwrap_err();

        assert_eq!(err.error_type, ErrorType::NetworkError);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn repeated_requests_are_identical_and_uncached() {
        let idx = index();
        let generator = Arc::new(ScriptedGenerator::ok("same", "1. x"));
        let e = engine(Some(idx.clone()), generator.clone());
        let req = QueryRequest::new("q");

        let first = e.answer(&req).await.unwrap();
        let second = e.answer(&req).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(idx.calls.load(Ordering::SeqCst), 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 4);
    }
}

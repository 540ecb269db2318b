use crate::BoxFuture;
use crate::errors::StoreError;

/// Provider interface for query embeddings.
///
/// Async because real providers (Ollama, OpenAI-compatible APIs) perform HTTP
/// requests. The returned vector must live in the same space the verses were
/// indexed with.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>>;
}

pub mod llm_embedder;

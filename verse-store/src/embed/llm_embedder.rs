//! Embedding provider backed by the shared LLM service.

use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use tracing::warn;

use crate::{BoxFuture, EmbeddingsProvider, StoreError};

/// Embeds text through the `embedding` profile of [`LlmServiceProfiles`].
#[derive(Clone, Debug)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: usize,
}

impl LlmEmbedder {
    /// `dim` is the vector length the collection expects.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
        Box::pin(async move {
            let vector = self
                .svc
                .embed(text)
                .await
                .map_err(|e| StoreError::Embedding(e.to_string()))?;

            check_dim(vector, self.dim)
        })
    }
}

fn check_dim(vector: Vec<f32>, want: usize) -> Result<Vec<f32>, StoreError> {
    if vector.len() != want {
        warn!(got = vector.len(), want, "embedding dimension mismatch");
        return Err(StoreError::VectorSizeMismatch {
            got: vector.len(),
            want,
        });
    }
    Ok(vector)
}

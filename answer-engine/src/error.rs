//! Typed error for the answer-engine crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;
use verse_store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Embedding or vector search failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] StoreError),

    /// The generation call failed (or its config was invalid).
    #[error("generation failed: {0}")]
    Generation(#[from] AiLlmError),
}

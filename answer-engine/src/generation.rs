//! Text-generation seam used by the pipeline.

use ai_llm_service::{AiLlmError, GenerationParams, LlmServiceProfiles};
use verse_store::BoxFuture;

/// One prompt in, one completion out. No retries, no streaming.
pub trait TextGenerator: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        params: GenerationParams,
    ) -> BoxFuture<'a, Result<String, AiLlmError>>;
}

impl TextGenerator for LlmServiceProfiles {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        params: GenerationParams,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.generate(prompt, params))
    }
}

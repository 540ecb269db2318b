//! Shared LLM service with two profiles: `generation` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Clients are built eagerly, so a bad profile fails at startup, not on
//!   the first request.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{GenerationParams, LlmServiceProfiles};
//! use ai_llm_service::config::default_config::{config_embedding, config_generation};
//!
//! # async fn run() -> Result<(), ai_llm_service::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::new(config_generation()?, config_embedding()?)?);
//!
//! let txt = svc.generate("What is dharma?", GenerationParams::new(0.5, 1024)).await?;
//! let emb = svc.embed("dharma").await?;
//! println!("{txt} / dim = {}", emb.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

use crate::{
    config::{
        generation_params::GenerationParams, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Concrete client behind a profile.
#[derive(Debug, Clone)]
enum Backend {
    Ollama(Arc<OllamaService>),
    OpenAI(Arc<OpenAiService>),
}

impl Backend {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Self::Ollama(Arc::new(OllamaService::new(cfg.clone())?)),
            LlmProvider::OpenAI => Self::OpenAI(Arc::new(OpenAiService::new(cfg.clone())?)),
        })
    }
}

/// Shared service that manages the **generation** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: LlmModelConfig,

    generation_backend: Backend,
    embedding_backend: Backend,
}

impl LlmServiceProfiles {
    /// Creates the service and builds one HTTP client per profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] when a profile is inconsistent (missing key,
    /// bad endpoint) or the HTTP client cannot be built.
    pub fn new(generation: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let generation_backend = Backend::build(&generation)?;
        let embedding_backend = Backend::build(&embedding)?;

        info!(
            generation_provider = ?generation.provider,
            generation_model = %generation.model,
            embedding_provider = ?embedding.provider,
            embedding_model = %embedding.model,
            "LLM profiles ready"
        );

        Ok(Self {
            generation,
            embedding,
            generation_backend,
            embedding_backend,
        })
    }

    /// Generates text using the **generation** profile.
    ///
    /// `params` carry the per-call temperature and token budget; unset
    /// fields fall back to the profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if generation fails.
    pub async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, AiLlmError> {
        match &self.generation_backend {
            Backend::Ollama(cli) => cli.generate(prompt, params).await,
            Backend::OpenAI(cli) => cli.complete(prompt, params).await,
        }
    }

    /// Computes embeddings using the **embedding** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding_backend {
            Backend::Ollama(cli) => cli.embeddings(input).await,
            Backend::OpenAI(cli) => cli.embeddings(input).await,
        }
    }

    /// Returns references to the current profiles `(generation, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.generation, &self.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn builds_mixed_providers() {
        let groq = LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "llama-3.1-8b-instant".into(),
            endpoint: "https://api.groq.com/openai".into(),
            api_key: Some("gsk_test".into()),
            ..ollama("unused")
        };
        let svc = LlmServiceProfiles::new(groq, ollama("all-minilm")).unwrap();
        let (generation, embedding) = svc.profiles();
        assert_eq!(generation.provider, LlmProvider::OpenAI);
        assert_eq!(embedding.model, "all-minilm");
    }

    #[test]
    fn rejects_profile_without_api_key() {
        let mut groq = ollama("llama-3.1-8b-instant");
        groq.provider = LlmProvider::OpenAI;
        assert!(LlmServiceProfiles::new(groq, ollama("all-minilm")).is_err());
    }
}

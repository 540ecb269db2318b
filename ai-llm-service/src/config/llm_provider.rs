use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for LLM inference and embeddings.
///
/// `OpenAI` covers every OpenAI-compatible REST API, including Groq, which
/// exposes the same `/v1/chat/completions` contract under its own base URL.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let provider = LlmProvider::parse("groq").unwrap();
/// assert_eq!(provider, LlmProvider::OpenAI);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local or remote Ollama runtime.
    Ollama,
    /// OpenAI-compatible API (OpenAI, Groq).
    OpenAI,
}

impl LlmProvider {
    /// Parses a provider name as found in `LLM_KIND` / `EMBEDDING_PROVIDER`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedProvider`] for unknown names.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" | "groq" | "chatgpt" => Ok(Self::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

use crate::config::{generation_params::GenerationParams, llm_provider::LlmProvider};

/// Configuration for an LLM model invocation.
///
/// Holds both general and provider-specific parameters. `temperature` and
/// `max_tokens` are the profile defaults; a single call may override them with
/// [`GenerationParams`].
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "llama-3.1-8b-instant".to_string(),
///     endpoint: "https://api.groq.com/openai".to_string(),
///     api_key: Some("gsk_...".to_string()),
///     max_tokens: None,
///     temperature: None,
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(cfg.timeout().as_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string (e.g., `"llama-3.1-8b-instant"`, `"all-minilm"`).
    pub model: String,

    /// Base URL of the API; provider paths are appended to it.
    pub endpoint: String,

    /// Optional API key for authentication (Groq, OpenAI).
    pub api_key: Option<String>,

    /// Default maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Default sampling temperature.
    pub temperature: Option<f64>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f64>,

    /// Optional request timeout (in seconds). Defaults to 60.
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Effective HTTP timeout for this profile.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.unwrap_or(60))
    }

    /// Merges per-call overrides with the profile defaults.
    pub fn resolve(&self, params: GenerationParams) -> GenerationParams {
        GenerationParams {
            temperature: params.temperature.or(self.temperature),
            max_tokens: params.max_tokens.or(self.max_tokens),
        }
    }
}

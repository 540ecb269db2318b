//! Default LLM configs loaded from environment variables.
//!
//! Two roles are used by the backend:
//!
//! - **Generation** → chat/completion model that writes the answer and the
//!   follow-up questions (Groq `llama-3.1-8b-instant` by default).
//! - **Embedding** → sentence-embedding model used to vectorise the question
//!   (Ollama `all-minilm` by default, matching the model the index was built with).
//!
//! # Environment variables
//!
//! Generation:
//! - `LLM_KIND`          = `groq` (default) | `openai` | `ollama`
//! - `GROQ_API_KEY`      = API key (mandatory for groq/openai)
//! - `GROQ_API_BASE`     = base URL (default `https://api.groq.com/openai`)
//! - `GROQ_MODEL`        = model id (default `llama-3.1-8b-instant`)
//! - `OLLAMA_MODEL`      = model id (mandatory for `LLM_KIND=ollama`)
//! - `LLM_TIMEOUT_SECS`  = HTTP timeout (default 60)
//!
//! Embedding:
//! - `EMBEDDING_PROVIDER` = `ollama` (default) | `openai`
//! - `EMBEDDING_MODEL`    = model id (default `all-minilm`)
//! - `EMBEDDING_API_BASE` / `EMBEDDING_API_KEY` = OpenAI-compatible endpoint + key
//!
//! Ollama endpoint (either role): `OLLAMA_URL` or `OLLAMA_PORT`.

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u64, env_or, must_env, validate_http_endpoint,
    },
};

pub const DEFAULT_GROQ_API_BASE: &str = "https://api.groq.com/openai";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
pub const DEFAULT_EMBEDDING_API_BASE: &str = "https://api.openai.com";

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
/// - [`ConfigError::InvalidFormat`] if `OLLAMA_URL` has no http(s) scheme
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", &url)?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Ok("http://localhost:11434".to_string())
}

/// Constructs the **generation** profile.
///
/// Sampling defaults are left unset here: every call passes its own
/// temperature and token budget.
///
/// # Errors
/// - [`ConfigError::MissingVar`] when `GROQ_API_KEY` (groq/openai) or
///   `OLLAMA_MODEL` (ollama) is absent
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    let provider = LlmProvider::parse(&env_or("LLM_KIND", "groq"))?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(60));

    let cfg = match provider {
        LlmProvider::OpenAI => {
            let endpoint = env_or("GROQ_API_BASE", DEFAULT_GROQ_API_BASE);
            validate_http_endpoint("GROQ_API_BASE", &endpoint)?;
            LlmModelConfig {
                provider,
                model: env_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
                endpoint,
                api_key: Some(must_env("GROQ_API_KEY")?),
                max_tokens: None,
                temperature: None,
                top_p: None,
                timeout_secs,
            }
        }
        LlmProvider::Ollama => LlmModelConfig {
            provider,
            model: must_env("OLLAMA_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs,
        },
    };

    debug!(provider = ?cfg.provider, model = %cfg.model, endpoint = %cfg.endpoint, "generation profile resolved");
    Ok(cfg)
}

/// Constructs the **embedding** profile.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `timeout_secs = Some(30)`
///
/// # Errors
/// - [`ConfigError::MissingVar`] when `EMBEDDING_PROVIDER=openai` and
///   `EMBEDDING_API_KEY` is absent
/// - [`ConfigError::UnsupportedProvider`] for an unknown `EMBEDDING_PROVIDER`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = LlmProvider::parse(&env_or("EMBEDDING_PROVIDER", "ollama"))?;
    let model = env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL);

    let (endpoint, api_key) = match provider {
        LlmProvider::Ollama => (ollama_endpoint()?, None),
        LlmProvider::OpenAI => {
            let endpoint = env_or("EMBEDDING_API_BASE", DEFAULT_EMBEDDING_API_BASE);
            validate_http_endpoint("EMBEDDING_API_BASE", &endpoint)?;
            (endpoint, Some(must_env("EMBEDDING_API_KEY")?))
        }
    };

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    };

    debug!(provider = ?cfg.provider, model = %cfg.model, endpoint = %cfg.endpoint, "embedding profile resolved");
    Ok(cfg)
}

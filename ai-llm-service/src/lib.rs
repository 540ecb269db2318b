//! Shared LLM plumbing for the Gita backend.
//!
//! - [`config`]: model configs and env-driven defaults for the generation and
//!   embedding profiles.
//! - [`services`]: thin HTTP clients for OpenAI-compatible APIs (Groq, OpenAI)
//!   and Ollama.
//! - [`service_profiles`]: the [`LlmServiceProfiles`] facade that routes a call
//!   to the right client.
//! - [`error_handler`]: the unified [`AiLlmError`].
//! - [`telemetry`]: the `tracing-subscriber` layer used by the binary.

pub mod config {
    pub mod default_config;
    pub mod generation_params;
    pub mod llm_model_config;
    pub mod llm_provider;
}
pub mod error_handler;
pub mod service_profiles;
pub mod services {
    pub mod ollama_service;
    pub mod open_ai_service;
}
pub mod telemetry;

pub use config::generation_params::GenerationParams;
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;

//! Runtime configuration loaded from environment variables.

use ai_llm_service::GenerationParams;
use ai_llm_service::error_handler::{env_opt_f64, env_opt_u32};

use crate::error::EngineError;

/// Sampling settings for the two generation calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Answer call: temperature 0.5, 1024 tokens by default.
    pub answer: GenerationParams,
    /// Related-questions call: temperature 0.7, 256 tokens by default.
    pub related: GenerationParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            answer: GenerationParams::new(0.5, 1024),
            related: GenerationParams::new(0.7, 256),
        }
    }
}

impl EngineConfig {
    /// Reads `ANSWER_TEMPERATURE`, `ANSWER_MAX_TOKENS`, `RELATED_TEMPERATURE`
    /// and `RELATED_MAX_TOKENS`; unset values keep their defaults.
    ///
    /// # Errors
    /// Returns [`EngineError::Generation`] wrapping a config error when a
    /// value is set but not a number.
    pub fn from_env() -> Result<Self, EngineError> {
        let d = Self::default();
        Ok(Self {
            answer: GenerationParams {
                temperature: env_opt_f64("ANSWER_TEMPERATURE")?.or(d.answer.temperature),
                max_tokens: env_opt_u32("ANSWER_MAX_TOKENS")?.or(d.answer.max_tokens),
            },
            related: GenerationParams {
                temperature: env_opt_f64("RELATED_TEMPERATURE")?.or(d.related.temperature),
                max_tokens: env_opt_u32("RELATED_MAX_TOKENS")?.or(d.related.max_tokens),
            },
        })
    }
}

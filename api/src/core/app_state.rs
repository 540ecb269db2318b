use std::sync::Arc;

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_embedding, config_generation},
};
use answer_engine::{AnswerEngine, EngineConfig, EngineDeps, TextGenerator};
use tracing::{info, warn};
use verse_store::{EmbeddingsProvider, LlmEmbedder, QdrantVerseIndex, VerseIndex, VerseStoreConfig};

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnswerEngine>,
}

impl AppState {
    pub fn new(engine: AnswerEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Builds the LLM clients, binds the verse index and assembles the engine.
    ///
    /// Missing LLM credentials or malformed numbers fail startup. An
    /// unreachable Qdrant or a missing collection does not: the service
    /// starts without an index and reports `database_unavailable` per request.
    pub async fn from_env() -> Result<Self, AppError> {
        let svc = Arc::new(LlmServiceProfiles::new(
            config_generation()?,
            config_embedding()?,
        )?);
        let engine_cfg = EngineConfig::from_env()?;
        let store_cfg = VerseStoreConfig::from_env()?;

        let embedder: Arc<dyn EmbeddingsProvider> =
            Arc::new(LlmEmbedder::new(svc.clone(), store_cfg.embedding_dim));

        let index: Option<Arc<dyn VerseIndex>> =
            match QdrantVerseIndex::connect(store_cfg, embedder).await {
                Ok(index) => Some(Arc::new(index)),
                Err(err) => {
                    warn!(error = %err, "verse index unavailable; queries will fail with database_unavailable");
                    None
                }
            };

        let generator: Arc<dyn TextGenerator> = svc;
        info!(index_bound = index.is_some(), "answer engine ready");

        Ok(Self::new(AnswerEngine::new(
            EngineDeps { index, generator },
            engine_cfg,
        )))
    }
}

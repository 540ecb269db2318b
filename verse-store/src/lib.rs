//! Read-only verse retrieval over Qdrant.
//!
//! The crate exposes one seam, [`VerseIndex`]: "give me the `k` verses closest
//! to this question". [`QdrantVerseIndex`] is the production binding; it
//! embeds the question with an [`EmbeddingsProvider`], searches the verse
//! collection and maps payloads to [`Passage`]s ordered by ascending distance.
//!
//! The collection is populated by a separate indexing job; nothing here writes
//! to it.

mod config;
mod embed;
mod errors;
mod qdrant_facade;
mod record;
mod retrieve;

use std::{future::Future, pin::Pin, sync::Arc};

pub use config::{DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIM, DistanceKind, VerseStoreConfig};
pub use embed::EmbeddingsProvider;
pub use embed::llm_embedder::LlmEmbedder;
pub use errors::StoreError;
pub use record::{Passage, RankedMatch};

use tracing::{info, trace};

/// Boxed, `Send` future used by the object-safe async traits of the workspace.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbour lookup over indexed verses.
pub trait VerseIndex: Send + Sync {
    /// Returns at most `k` matches ordered by ascending distance.
    fn search<'a>(
        &'a self,
        query_text: &'a str,
        k: u64,
    ) -> BoxFuture<'a, Result<Vec<RankedMatch>, StoreError>>;
}

/// Qdrant-backed [`VerseIndex`].
///
/// This is the single entry point recommended for application code.
pub struct QdrantVerseIndex {
    cfg: VerseStoreConfig,
    client: qdrant_facade::QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl QdrantVerseIndex {
    /// Binds to the configured collection.
    ///
    /// # Errors
    /// - [`StoreError::Config`] for invalid config
    /// - [`StoreError::Qdrant`] when the server cannot be reached
    /// - [`StoreError::CollectionMissing`] when the collection was never indexed
    pub async fn connect(
        cfg: VerseStoreConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, StoreError> {
        trace!("QdrantVerseIndex::connect collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        client.ensure_collection_exists().await?;

        info!(
            url = %cfg.qdrant_url,
            collection = %cfg.collection,
            distance = ?cfg.distance,
            exact = cfg.exact_search,
            "verse index bound"
        );

        Ok(Self {
            cfg,
            client,
            embedder,
        })
    }
}

impl VerseIndex for QdrantVerseIndex {
    fn search<'a>(
        &'a self,
        query_text: &'a str,
        k: u64,
    ) -> BoxFuture<'a, Result<Vec<RankedMatch>, StoreError>> {
        Box::pin(async move {
            if k == 0 {
                return Ok(Vec::new());
            }
            retrieve::search_verses(&self.cfg, &self.client, self.embedder.as_ref(), query_text, k)
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder(AtomicUsize);

    impl EmbeddingsProvider for CountingEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(StoreError::Embedding("not reachable in tests".into())) })
        }
    }

    #[tokio::test]
    async fn zero_k_skips_embedding_and_search() {
        let cfg = VerseStoreConfig::new_default("http://localhost:6334", DEFAULT_COLLECTION);
        let embedder = Arc::new(CountingEmbedder(AtomicUsize::new(0)));
        let index = QdrantVerseIndex {
            client: qdrant_facade::QdrantFacade::new(&cfg).unwrap(),
            cfg,
            embedder: embedder.clone(),
        };

        let out = index.search("what is duty?", 0).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(embedder.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let cfg = VerseStoreConfig::new_default("http://localhost:6334", DEFAULT_COLLECTION);
        let embedder = Arc::new(CountingEmbedder(AtomicUsize::new(0)));
        let index = QdrantVerseIndex {
            client: qdrant_facade::QdrantFacade::new(&cfg).unwrap(),
            cfg,
            embedder: embedder.clone(),
        };

        let err = index.search("what is duty?", 3).await.unwrap_err();
        assert!(matches!(err, StoreError::Embedding(_)));
        assert_eq!(embedder.0.load(Ordering::SeqCst), 1);
    }
}

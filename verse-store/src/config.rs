//! Runtime and collection configuration.

use crate::errors::StoreError;

/// Default logical name of the verse collection.
pub const DEFAULT_COLLECTION: &str = "gita_verses";
/// Dimension of `all-minilm` / `all-MiniLM-L6-v2` sentence embeddings.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Distance function the collection was created with.
///
/// Qdrant reports a *score*; for similarity metrics (cosine, dot) higher is
/// closer, for Euclid the score already is the L2 distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity (the indexer's metric).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl DistanceKind {
    /// Parses `cosine` | `dot` | `euclid` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" => Ok(Self::Dot),
            "euclid" | "euclidean" | "l2" => Ok(Self::Euclid),
            other => Err(StoreError::Config(format!(
                "QDRANT_DISTANCE: unsupported distance '{other}'"
            ))),
        }
    }

    /// Converts a Qdrant score into a distance where lower means more similar.
    pub fn to_distance(self, score: f32) -> f64 {
        let score = f64::from(score);
        match self {
            Self::Cosine | Self::Dot => 1.0 - score,
            Self::Euclid => score,
        }
    }
}

/// Configuration for verse retrieval.
#[derive(Clone, Debug)]
pub struct VerseStoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected query vector length.
    pub embedding_dim: usize,
}

impl VerseStoreConfig {
    /// Creates a default config for a given Qdrant endpoint and collection name.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            exact_search: false,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `QDRANT_DISTANCE`, `RAG_EXACT_SEARCH` and `EMBEDDING_DIM`.
    ///
    /// # Errors
    /// Returns [`StoreError::Config`] for unparsable values.
    pub fn from_env() -> Result<Self, StoreError> {
        let embedding_dim = match env_opt("EMBEDDING_DIM") {
            Some(v) => v.parse::<usize>().map_err(|_| {
                StoreError::Config(format!("EMBEDDING_DIM: expected usize, got '{v}'"))
            })?,
            None => DEFAULT_EMBEDDING_DIM,
        };

        let cfg = Self {
            qdrant_url: env_opt("QDRANT_URL").unwrap_or_else(|| "http://localhost:6334".into()),
            qdrant_api_key: env_opt("QDRANT_API_KEY"),
            collection: env_opt("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            distance: match env_opt("QDRANT_DISTANCE") {
                Some(v) => DistanceKind::parse(&v)?,
                None => DistanceKind::Cosine,
            },
            exact_search: env_opt("RAG_EXACT_SEARCH").is_some_and(|v| v == "true" || v == "1"),
            embedding_dim,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env_opt(k: &str) -> Option<String> {
    std::env::var(k)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for verse-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),

    /// The configured collection does not exist on the server.
    #[error("qdrant collection '{0}' does not exist")]
    CollectionMissing(String),

    /// The embedding provider failed; the message keeps the upstream text.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Query vector length does not match the collection.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },
}

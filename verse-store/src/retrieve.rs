//! Retrieval: embed the question, search, map hits to ranked passages.

use tracing::{debug, trace};

use crate::config::{DistanceKind, VerseStoreConfig};
use crate::embed::EmbeddingsProvider;
use crate::errors::StoreError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{Passage, RankedMatch};

/// Embeds `query_text` and returns up to `k` verses ordered by ascending distance.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn search_verses(
    cfg: &VerseStoreConfig,
    client: &QdrantFacade,
    provider: &dyn EmbeddingsProvider,
    query_text: &str,
    k: u64,
) -> Result<Vec<RankedMatch>, StoreError> {
    trace!("retrieve::search_verses k={k} exact={}", cfg.exact_search);

    let qv = provider.embed(query_text).await?;
    let hits = client.search(qv, k, cfg.exact_search).await?;
    let ranked = to_ranked(hits, cfg.distance, k);

    debug!(
        collection = %client.collection,
        requested = k,
        returned = ranked.len(),
        "verses retrieved"
    );
    Ok(ranked)
}

/// Converts raw `(score, payload)` hits into distance-ranked matches.
///
/// Sorting is stable, so equal distances keep the store's order.
pub fn to_ranked(
    hits: Vec<(f32, serde_json::Value)>,
    distance: DistanceKind,
    k: u64,
) -> Vec<RankedMatch> {
    let mut out: Vec<RankedMatch> = hits
        .into_iter()
        .map(|(score, payload)| RankedMatch {
            passage: Passage::from_payload(&payload),
            distance: distance.to_distance(score),
        })
        .collect();

    out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    out.truncate(usize::try_from(k).unwrap_or(usize::MAX));
    out
}

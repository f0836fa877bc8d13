//! Retrieval helpers: low-level vector search and high-level RAG context.

use crate::config::RagConfig;
use crate::embed::EmbeddingsProvider;
use crate::errors::RagError;
use crate::filters::to_qdrant_filter;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{RagHit, RagQuery};

use qdrant_client::qdrant::Filter;
use tracing::trace;

/// Performs a low-level similarity search given a ready query vector.
///
/// # Errors
/// Returns `RagError::VectorSizeMismatch` if the vector does not match the
/// configured dimension, `RagError::Qdrant` on client failures.
pub async fn search_by_vector(
    cfg: &RagConfig,
    client: &QdrantFacade,
    query_vector: Vec<f32>,
    top_k: u64,
    filter: Option<Filter>,
    with_payload: bool,
) -> Result<Vec<(f32, serde_json::Value)>, RagError> {
    trace!("retrieve::search_by_vector top_k={top_k} with_payload={with_payload}");
    check_dim(cfg, &query_vector)?;
    client
        .search(query_vector, top_k, filter, with_payload, cfg.exact_search)
        .await
}

/// Embeds the query text and returns RAG hits in store relevance order.
///
/// # Errors
/// Returns embedding/provider errors or Qdrant failures.
pub async fn rag_context(
    cfg: &RagConfig,
    client: &QdrantFacade,
    query: RagQuery<'_>,
    provider: &dyn EmbeddingsProvider,
) -> Result<Vec<RagHit>, RagError> {
    trace!(
        "retrieve::rag_context top_k={} filter={}",
        query.top_k,
        query.filter.is_some()
    );

    let qv = provider.embed(query.text).await?;
    let filter = query.filter.as_ref().map(to_qdrant_filter);

    let hits = search_by_vector(cfg, client, qv, query.top_k, filter, true).await?;

    let out: Vec<RagHit> = hits
        .into_iter()
        .map(|(score, payload)| RagHit::from_payload(score, payload, &cfg.text_key))
        .collect();

    trace!("retrieve::rag_context hits={}", out.len());
    Ok(out)
}

fn check_dim(cfg: &RagConfig, v: &[f32]) -> Result<(), RagError> {
    match cfg.embedding_dim {
        Some(want) if want != v.len() => Err(RagError::VectorSizeMismatch { got: v.len(), want }),
        _ => Ok(()),
    }
}

//! Similarity search over embedded paper chunks stored in Qdrant.
//!
//! This crate provides a small API to:
//! - embed a textual query with a pluggable [`EmbeddingsProvider`]
//! - retrieve top‑K chunks, optionally restricted by exact payload filters
//!
//! Chunks are written by the notes/ingestion pipeline; this crate only reads.

mod config;
mod embed;
mod errors;
mod filters;
mod qdrant_facade;
mod record;
mod retrieve;

pub use config::RagConfig;
pub use embed::{EmbedFuture, EmbeddingsProvider, llm_embedder::LlmEmbedder};
pub use errors::RagError;
pub use record::{RagFilter, RagHit, RagQuery};

use tracing::trace;

/// High-level facade that wires configuration and Qdrant client.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` / `RagError::Qdrant` if the client
    /// initialization fails.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        trace!("RagStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Active configuration.
    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }

    /// Builds RAG context for a textual query using the provided embedding provider.
    ///
    /// Hits keep the store's native relevance order.
    ///
    /// # Errors
    /// Returns embedding errors or Qdrant failures.
    pub async fn rag_context(
        &self,
        query: RagQuery<'_>,
        provider: &dyn EmbeddingsProvider,
    ) -> Result<Vec<RagHit>, RagError> {
        trace!("RagStore::rag_context top_k={}", query.top_k);
        retrieve::rag_context(&self.cfg, &self.client, query, provider).await
    }
}

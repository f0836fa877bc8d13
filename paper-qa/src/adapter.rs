//! Production [`DocumentStore`]: Qdrant for chunks, Supabase for records.

use paper_store::{PaperRow, PaperStoreClient};
use rag_store::{EmbeddingsProvider, RagFilter, RagHit, RagQuery, RagStore};
use tracing::debug;

use crate::store::{DocumentStore, PaperFilter, StoreError, StoreFuture};
use crate::types::{Note, PaperRecord, RetrievedChunk};

/// Payload field holding the paper identifier of a chunk.
const PAPER_FIELD: &str = "name";

pub struct QdrantPaperStore<E> {
    chunks: RagStore,
    embedder: E,
    papers: PaperStoreClient,
}

impl<E: EmbeddingsProvider> QdrantPaperStore<E> {
    pub fn new(chunks: RagStore, embedder: E, papers: PaperStoreClient) -> Self {
        Self {
            chunks,
            embedder,
            papers,
        }
    }
}

impl<E: EmbeddingsProvider> DocumentStore for QdrantPaperStore<E> {
    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: u64,
        filter: &'a PaperFilter,
    ) -> StoreFuture<'a, Vec<RetrievedChunk>> {
        Box::pin(async move {
            let q = RagQuery {
                text: query,
                top_k: k,
                filter: Some(RagFilter::eq(PAPER_FIELD, filter.name.as_str())),
            };
            let hits = self
                .chunks
                .rag_context(q, &self.embedder)
                .await
                .map_err(|e| StoreError(e.to_string()))?;
            debug!(hits = hits.len(), "similarity search done");
            Ok(hits.into_iter().map(chunk_from_hit).collect())
        })
    }

    fn get_paper<'a>(&'a self, paper_url: &'a str) -> StoreFuture<'a, Option<PaperRecord>> {
        Box::pin(async move {
            let row = self
                .papers
                .get_paper(paper_url)
                .await
                .map_err(|e| StoreError(e.to_string()))?;
            Ok(row.map(record_from_row))
        })
    }

    fn save_qa<'a>(
        &'a self,
        question: &'a str,
        answer: &'a str,
        context_snapshot: &'a str,
        followup_questions: &'a [String],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.papers
                .save_qa(question, answer, context_snapshot, followup_questions)
                .await
                .map_err(|e| StoreError(e.to_string()))
        })
    }
}

fn chunk_from_hit(hit: RagHit) -> RetrievedChunk {
    RetrievedChunk {
        text: hit.text,
        paper: hit.source,
        position: hit.position,
        score: hit.score,
    }
}

fn record_from_row(row: PaperRow) -> PaperRecord {
    PaperRecord {
        notes: row.notes.map(|notes| {
            notes
                .into_iter()
                .map(|n| Note {
                    note: n.note,
                    page_numbers: n.page_numbers,
                })
                .collect()
        }),
    }
}

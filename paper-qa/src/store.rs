//! Document store contract consumed by the QA pipeline.
//!
//! Implementations hold embedded chunks plus per-paper note and QA records.
//! Async methods return boxed futures so the trait stays object safe and
//! can be shared as `Arc<dyn DocumentStore>`.

use std::{future::Future, pin::Pin};

use thiserror::Error;

use crate::types::{PaperRecord, RetrievedChunk};

/// Opaque failure reported by a store backend.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Restricts similarity search to one paper (payload field `name`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaperFilter {
    pub name: String,
}

pub trait DocumentStore: Send + Sync {
    /// Top-`k` chunks for `query` among chunks matching `filter`, best first.
    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: u64,
        filter: &'a PaperFilter,
    ) -> StoreFuture<'a, Vec<RetrievedChunk>>;

    /// Paper record by identifier; `Ok(None)` if there is none.
    fn get_paper<'a>(&'a self, paper_url: &'a str) -> StoreFuture<'a, Option<PaperRecord>>;

    /// Appends one QA record. Not idempotent: each call creates a new record.
    fn save_qa<'a>(
        &'a self,
        question: &'a str,
        answer: &'a str,
        context_snapshot: &'a str,
        followup_questions: &'a [String],
    ) -> StoreFuture<'a, ()>;
}

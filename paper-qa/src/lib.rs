//! Retrieval-augmented question answering over a single paper.
//!
//! Public API: [`QaOrchestrator::qa_on_paper`]. It retrieves the top chunks
//! of the paper for the question, loads the paper's notes, builds a prompt,
//! asks the model for structured answers through the `questionAnswer` tool,
//! validates them and saves one QA record per answer group.
//!
//! The pipeline only talks to [`DocumentStore`] and
//! [`StructuredAnswerInvoker`]; [`build_from_env`] wires the production
//! implementations (Qdrant + Supabase + OpenAI/Ollama).

mod adapter;
mod cfg;
mod context;
mod error;
mod invoker;
mod orchestrator;
mod parser;
mod persist;
mod prompt;
mod store;
mod types;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use paper_store::PaperStoreClient;
use rag_store::{LlmEmbedder, RagStore};
use tracing::info;

pub use adapter::QdrantPaperStore;
pub use cfg::QaConfig;
pub use context::{AssembledContext, assemble};
pub use error::QaError;
pub use invoker::{
    ANSWER_TOOL_NAME, InvokeFuture, InvokerConfig, LlmAnswerInvoker, StructuredAnswerInvoker,
    answer_tool,
};
pub use orchestrator::{QaOrchestrator, TOP_K};
pub use parser::parse;
pub use persist::persist_batch;
pub use prompt::compose;
pub use store::{DocumentStore, PaperFilter, StoreError, StoreFuture};
pub use types::{AnswerBatch, AnswerGroup, AnswerRecord, Note, PaperRecord, RetrievedChunk};

/// Builds the production orchestrator from an explicit config.
///
/// # Errors
/// Returns [`QaError::Config`] if a client cannot be created.
pub fn build(cfg: QaConfig) -> Result<QaOrchestrator, QaError> {
    let svc = Arc::new(LlmServiceProfiles::new(
        cfg.chat.clone(),
        cfg.embedding.clone(),
    ));

    let chunks = RagStore::new(cfg.rag).map_err(|e| QaError::Config(e.to_string()))?;
    let embedder = LlmEmbedder::new(svc.clone(), chunks.config().embedding_dim);
    let papers = PaperStoreClient::new(cfg.papers).map_err(|e| QaError::Config(e.to_string()))?;

    info!(
        collection = %chunks.config().collection,
        papers_table = %papers.config().papers_table,
        qa_table = %papers.config().qa_table,
        model = %cfg.chat.model,
        "paper QA pipeline ready"
    );

    let store = Arc::new(QdrantPaperStore::new(chunks, embedder, papers));
    let invoker = Arc::new(LlmAnswerInvoker::new(svc, InvokerConfig::new(cfg.chat)));

    Ok(QaOrchestrator::new(store, invoker).with_context_warning(cfg.context_warn_chars))
}

/// Reads [`QaConfig`] from the environment and calls [`build`].
pub fn build_from_env() -> Result<QaOrchestrator, QaError> {
    build(QaConfig::from_env()?)
}

//! Typed error for the paper-qa crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    /// Startup configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Caller input rejected before any I/O (e.g. blank paper identifier).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Similarity search failed (embedding or vector store).
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// Paper record lookup failed (not the same as "not found").
    #[error("paper lookup failed: {0}")]
    PaperLookup(String),

    /// The language model call failed (transport, provider status, decoding).
    #[error("model invocation failed: {0}")]
    Invocation(String),

    /// Model output does not match the answer schema.
    #[error("model output rejected: {0}")]
    Parse(String),

    /// At least one answer record could not be saved.
    #[error("persisting answers failed: {0}")]
    Persistence(String),
}

impl From<ai_llm_service::AiLlmError> for QaError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        QaError::Invocation(e.to_string())
    }
}

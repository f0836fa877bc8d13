//! Error type for the paper record store.

use thiserror::Error;

/// Convenient alias for paper-store results.
pub type StoreResult<T> = Result<T, PaperStoreError>;

#[derive(Debug, Error)]
pub enum PaperStoreError {
    /// Missing or malformed configuration (env vars, URLs, keys).
    #[error("config error: {0}")]
    Config(String),

    /// Network/transport failure or client build failure.
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// PostgREST answered with a non-success status.
    #[error("unexpected status {status} from {url}: {snippet}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
        snippet: String,
    },

    /// Response body could not be decoded into the expected rows.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<ai_llm_service::AiLlmError> for PaperStoreError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        PaperStoreError::Config(e.to_string())
    }
}

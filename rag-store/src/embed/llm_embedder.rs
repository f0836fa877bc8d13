//! Embedding provider backed by the shared [`LlmServiceProfiles`].
//!
//! Uses the `embedding` profile, so the provider (OpenAI or Ollama) follows
//! the service configuration.

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use tracing::warn;

use crate::embed::{EmbedFuture, EmbeddingsProvider};
use crate::errors::RagError;

/// Embedder that delegates to the LLM service and checks the vector size.
#[derive(Clone, Debug)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: Option<usize>,
}

impl LlmEmbedder {
    /// `dim`: expected embedding size, `None` to accept any size.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;

            if let Some(want) = self.dim {
                if v.len() != want {
                    warn!(got = v.len(), want, "embedding size mismatch");
                    return Err(RagError::VectorSizeMismatch { got: v.len(), want });
                }
            }

            Ok(v)
        })
    }
}

//! Query embedding abstraction.

use crate::errors::RagError;
use std::{future::Future, pin::Pin};

pub mod llm_embedder;

/// Boxed future returned by [`EmbeddingsProvider::embed`].
pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async is required because real providers (OpenAI, Ollama) perform HTTP
/// requests. Implement this trait to plug in another backend.
pub trait EmbeddingsProvider: Send + Sync {
    /// Async embedding function.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;
}

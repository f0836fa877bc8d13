//! Runtime and collection configuration.

use crate::errors::RagError;

/// Configuration for similarity search over paper chunks.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimension; checked against every query vector.
    pub embedding_dim: Option<usize>,
    /// Payload key holding the chunk text.
    pub text_key: String,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            exact_search: false,
            embedding_dim: None,
            text_key: "text".into(),
        }
    }

    /// Builds the config from environment variables.
    ///
    /// - `QDRANT_URL` (default `http://127.0.0.1:6334`)
    /// - `QDRANT_API_KEY` (optional)
    /// - `QDRANT_COLLECTION` (default `arxiv_embeddings`)
    /// - `EMBEDDING_DIM` (optional usize)
    /// - `RAG_EXACT_SEARCH` (`true`/`false`, default `false`)
    /// - `RAG_TEXT_KEY` (default `text`)
    pub fn from_env() -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env("QDRANT_URL", "http://127.0.0.1:6334"),
            env("QDRANT_COLLECTION", "arxiv_embeddings"),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        cfg.exact_search = env("RAG_EXACT_SEARCH", "false") == "true";
        cfg.text_key = env("RAG_TEXT_KEY", "text");
        cfg.embedding_dim = match std::env::var("EMBEDDING_DIM") {
            Ok(v) if !v.trim().is_empty() => Some(
                v.trim()
                    .parse::<usize>()
                    .map_err(|_| RagError::Config(format!("EMBEDDING_DIM is not a usize: {v}")))?,
            ),
            _ => None,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.text_key.trim().is_empty() {
            return Err(RagError::Config("text_key is empty".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

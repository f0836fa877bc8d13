//! Core data models used by the library.

use serde_json::Value;

/// Query parameters for RAG retrieval.
pub struct RagQuery<'a> {
    pub text: &'a str,
    pub top_k: u64,
    pub filter: Option<RagFilter>,
}

/// A single retrieval hit with score, text and source metadata.
#[derive(Clone, Debug)]
pub struct RagHit {
    pub score: f32,
    pub text: String,
    /// Paper the chunk belongs to (payload `name`).
    pub source: Option<String>,
    /// Chunk position inside the paper (payload `position`, or `page`
    /// / `loc.pageNumber` as written by the notes pipeline).
    pub position: Option<i64>,
}

impl RagHit {
    /// Builds a hit from a JSON payload, reading the chunk text from `text_key`.
    pub fn from_payload(score: f32, payload: Value, text_key: &str) -> Self {
        let text = payload
            .get(text_key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let source = payload
            .get("name")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        let position = payload
            .get("position")
            .or_else(|| payload.get("page"))
            .or_else(|| payload.pointer("/loc/pageNumber"))
            .and_then(|v| v.as_i64());
        Self {
            score,
            text,
            source,
            position,
        }
    }
}

/// Exact-match filter; every pair must match (`must` semantics).
#[derive(Clone, Debug, Default)]
pub struct RagFilter {
    /// Exact match on a field, e.g. `{"name": "arxiv.org/abs/1234"}`.
    pub equals: Vec<(String, Value)>,
}

impl RagFilter {
    /// Filter with a single `field == value` condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            equals: vec![(field.into(), value.into())],
        }
    }
}

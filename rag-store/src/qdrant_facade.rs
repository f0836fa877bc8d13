//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! This facade concentrates all Qdrant interactions behind a minimal API,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use std::collections::HashMap;

use crate::config::RagConfig;
use crate::errors::RagError;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Filter, SearchParamsBuilder, SearchPointsBuilder, Value as QValue};
use tracing::{debug, info};

/// A facade over the Qdrant client.
pub struct QdrantFacade {
    pub(crate) client: Qdrant,
    pub(crate) collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// Supports optional API key authentication.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
        })
    }

    /// Performs a similarity search in Qdrant.
    ///
    /// Returns `(score, payload)` tuples in Qdrant's relevance order.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        filter: Option<Filter>,
        with_payload: bool,
        exact: bool,
    ) -> Result<Vec<(f32, serde_json::Value)>, RagError> {
        info!(
            "Searching in '{}' with top_k={}, with_payload={}, exact={}",
            self.collection, top_k, with_payload, exact
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(with_payload);

        if let Some(f) = filter {
            builder = builder.filter(f);
        }
        if exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let out: Vec<(f32, serde_json::Value)> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }
}

/// Converts a Qdrant payload (`HashMap<String, qdrant::Value>`) into JSON.
pub(crate) fn qpayload_to_json(p: HashMap<String, QValue>) -> serde_json::Value {
    let m: serde_json::Map<String, serde_json::Value> =
        p.into_iter().map(|(k, v)| (k, qvalue_to_json(v))).collect();
    serde_json::Value::Object(m)
}

/// Converts one Qdrant value into JSON, recursing into lists and structs
/// (chunk metadata like `loc.pageNumber` is nested).
fn qvalue_to_json(v: QValue) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;
    match v.kind {
        Some(K::StringValue(s)) => serde_json::Value::String(s),
        Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
        Some(K::DoubleValue(f)) => serde_json::json!(f),
        Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(K::ListValue(l)) => {
            serde_json::Value::Array(l.values.into_iter().map(qvalue_to_json).collect())
        }
        Some(K::StructValue(s)) => qpayload_to_json(s.fields),
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdrant_client::qdrant::{ListValue, Struct, value::Kind};
    use serde_json::json;

    fn q(kind: Kind) -> QValue {
        QValue { kind: Some(kind) }
    }

    #[test]
    fn nested_payload_is_converted() {
        let mut loc = HashMap::new();
        loc.insert("pageNumber".to_string(), q(Kind::IntegerValue(4)));

        let mut p = HashMap::new();
        p.insert("text".to_string(), q(Kind::StringValue("chunk".into())));
        p.insert("loc".to_string(), q(Kind::StructValue(Struct { fields: loc })));
        p.insert(
            "tags".to_string(),
            q(Kind::ListValue(ListValue {
                values: vec![q(Kind::BoolValue(true))],
            })),
        );
        p.insert("nothing".to_string(), QValue { kind: None });

        let j = qpayload_to_json(p);
        assert_eq!(
            j,
            json!({
                "text": "chunk",
                "loc": { "pageNumber": 4 },
                "tags": [true],
                "nothing": null
            })
        );
    }
}

//! Filter conversion to Qdrant `Filter`.
//!
//! Supports exact equality on scalar fields (`String`, `Number`, `Bool`).
//! All conditions go into `must`, so a paper filter really restricts the
//! search to that paper.

use crate::record::RagFilter;
use qdrant_client::qdrant::{
    Condition, FieldCondition, Filter, Match, condition::ConditionOneOf, r#match::MatchValue,
};
use tracing::{debug, warn};

/// Converts [`RagFilter`] to Qdrant [`Filter`].
///
/// - `String` → `Keyword`
/// - integer `Number` → `Integer`
/// - `Bool` → `Boolean`
///
/// Unsupported values are skipped with a warning.
pub fn to_qdrant_filter(f: &RagFilter) -> Filter {
    debug!("filters::to_qdrant_filter equals={}", f.equals.len());

    let mut must: Vec<Condition> = Vec::with_capacity(f.equals.len());

    for (field, val) in &f.equals {
        let value = match val {
            serde_json::Value::String(s) => MatchValue::Keyword(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => MatchValue::Integer(i),
                None => {
                    warn!(field = %field, "non-integer number in filter skipped");
                    continue;
                }
            },
            serde_json::Value::Bool(b) => MatchValue::Boolean(*b),
            _ => {
                warn!(field = %field, "unsupported filter value type skipped");
                continue;
            }
        };

        must.push(Condition {
            condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
                key: field.clone(),
                r#match: Some(Match {
                    match_value: Some(value),
                }),
                ..Default::default()
            })),
        });
    }

    Filter {
        must,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paper_filter_becomes_single_must_keyword() {
        let f = to_qdrant_filter(&RagFilter::eq("name", "arxiv.org/abs/1234"));
        assert_eq!(f.must.len(), 1);
        assert!(f.should.is_empty());

        let Some(ConditionOneOf::Field(fc)) = &f.must[0].condition_one_of else {
            panic!("expected field condition");
        };
        assert_eq!(fc.key, "name");
        assert_eq!(
            fc.r#match.as_ref().and_then(|m| m.match_value.clone()),
            Some(MatchValue::Keyword("arxiv.org/abs/1234".into()))
        );
    }

    #[test]
    fn unsupported_values_are_skipped() {
        let f = to_qdrant_filter(&RagFilter {
            equals: vec![
                ("a".into(), json!(1.5)),
                ("b".into(), json!(["x"])),
                ("c".into(), json!(true)),
            ],
        });
        assert_eq!(f.must.len(), 1);
    }
}

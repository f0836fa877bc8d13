//! Concurrent write-out of an answer batch.
//!
//! All records are written at once and every write runs to completion.
//! There is no rollback: records saved before a failure stay saved.

use futures::future::join_all;
use tracing::{debug, error};

use crate::error::QaError;
use crate::store::DocumentStore;
use crate::types::AnswerBatch;

/// Saves every record of `batch`; surfaces the first failure after all settle.
pub async fn persist_batch(store: &dyn DocumentStore, batch: &AnswerBatch) -> Result<(), QaError> {
    let writes = batch.records.iter().map(|r| {
        store.save_qa(
            &r.question,
            &r.answer,
            &r.context_snapshot,
            &r.followup_questions,
        )
    });
    let results = join_all(writes).await;

    let total = results.len();
    let mut first_err = None;
    let mut failed = 0usize;
    for (i, res) in results.into_iter().enumerate() {
        if let Err(e) = res {
            error!(record = i, error = %e, "saving answer record failed");
            failed += 1;
            first_err.get_or_insert(e);
        }
    }

    match first_err {
        None => {
            debug!(saved = total, "answer batch persisted");
            Ok(())
        }
        Some(e) => Err(QaError::Persistence(format!(
            "{failed} of {total} records failed, first: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::testing::FakeStore;
    use crate::types::AnswerGroup;

    fn batch(answers: &[&str]) -> AnswerBatch {
        let groups = answers
            .iter()
            .map(|a| AnswerGroup {
                answer: a.to_string(),
                followup_questions: vec![format!("more on {a}?")],
            })
            .collect();
        AnswerBatch::from_groups("q", "ctx", groups)
    }

    #[tokio::test]
    async fn every_record_is_saved_once() {
        let store = FakeStore::new(vec![], None);
        persist_batch(&store, &batch(&["A", "B", "C"])).await.unwrap();

        let saved = store.saved();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[1].followup_questions, vec!["more on B?"]);
        assert!(saved.iter().all(|r| r.question == "q" && r.context_snapshot == "ctx"));
    }

    #[tokio::test]
    async fn failure_is_reported_after_all_writes_settle() {
        let store = FakeStore::new(vec![], None).fail_answer("A");
        let err = persist_batch(&store, &batch(&["A", "B", "C"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("1 of 3"));
        assert_eq!(store.save_attempts(), 3);
        assert_eq!(store.saved().len(), 2);
    }

    #[tokio::test]
    async fn writes_are_in_flight_together() {
        // Each save waits until all three are pending; sequential writes would hang.
        let store = FakeStore::new(vec![], None).gated(3).fail_answer("B");
        let out = tokio::time::timeout(
            Duration::from_secs(2),
            persist_batch(&store, &batch(&["A", "B", "C"])),
        )
        .await
        .expect("writes were not issued concurrently");

        match out {
            Err(QaError::Persistence(msg)) => assert!(msg.contains("1 of 3"), "{msg}"),
            other => panic!("expected persistence error, got {other:?}"),
        }
        assert_eq!(store.save_attempts(), 3);
        let saved: Vec<String> = store.saved().into_iter().map(|r| r.answer).collect();
        assert_eq!(saved.len(), 2);
        assert!(!saved.contains(&"B".to_string()));
    }
}

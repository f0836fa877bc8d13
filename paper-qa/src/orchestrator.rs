//! End-to-end "ask a question about a paper".
//!
//! Stages, in order: validate → retrieve → paper lookup → compose → invoke →
//! parse → persist. Any failure aborts the remaining stages; nothing is
//! persisted unless parsing succeeded.

use std::sync::Arc;
use std::time::Instant;

use tracing::{Instrument, debug, info, info_span, warn};

use crate::context::assemble;
use crate::error::QaError;
use crate::invoker::StructuredAnswerInvoker;
use crate::parser::parse;
use crate::persist::persist_batch;
use crate::prompt::compose;
use crate::store::{DocumentStore, PaperFilter};
use crate::types::AnswerBatch;

/// Number of chunks retrieved per question.
pub const TOP_K: u64 = 8;

/// Stateless coordinator, shared across requests behind `Arc`.
#[derive(Clone)]
pub struct QaOrchestrator {
    store: Arc<dyn DocumentStore>,
    invoker: Arc<dyn StructuredAnswerInvoker>,
    context_warn_chars: Option<usize>,
}

impl QaOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, invoker: Arc<dyn StructuredAnswerInvoker>) -> Self {
        Self {
            store,
            invoker,
            context_warn_chars: None,
        }
    }

    /// Logs a warning when the assembled context exceeds `chars`.
    /// The context is still sent unchanged.
    pub fn with_context_warning(mut self, chars: Option<usize>) -> Self {
        self.context_warn_chars = chars;
        self
    }

    /// Answers `question` about `paper_url`.
    ///
    /// Returns `Ok(None)` when the paper has no record or no notes; nothing
    /// is persisted in that case. Otherwise returns the non-empty batch after
    /// all records were written.
    ///
    /// # Errors
    /// - [`QaError::InvalidRequest`] for a blank paper identifier
    /// - [`QaError::Retrieval`] / [`QaError::PaperLookup`] for store failures
    /// - [`QaError::Invocation`] / [`QaError::Parse`] for model failures
    /// - [`QaError::Persistence`] if any record write failed
    pub async fn qa_on_paper(
        &self,
        question: &str,
        paper_url: &str,
    ) -> Result<Option<AnswerBatch>, QaError> {
        let span = info_span!("qa_on_paper", paper = %paper_url);
        self.run(question, paper_url).instrument(span).await
    }

    async fn run(&self, question: &str, paper_url: &str) -> Result<Option<AnswerBatch>, QaError> {
        let started = Instant::now();

        if paper_url.trim().is_empty() {
            return Err(QaError::InvalidRequest("paper identifier is empty".into()));
        }

        let filter = PaperFilter {
            name: paper_url.to_string(),
        };
        let chunks = self
            .store
            .similarity_search(question, TOP_K, &filter)
            .await
            .map_err(|e| QaError::Retrieval(e.to_string()))?;
        debug!(chunks = chunks.len(), "retrieved chunks");

        let paper = self
            .store
            .get_paper(paper_url)
            .await
            .map_err(|e| QaError::PaperLookup(e.to_string()))?;

        let notes = match paper.and_then(|p| p.notes) {
            Some(notes) if !notes.is_empty() => notes,
            _ => {
                info!("paper or notes not found");
                return Ok(None);
            }
        };

        let ctx = assemble(&chunks, &notes);
        let ctx_chars = ctx.char_len();
        debug!(notes = notes.len(), ctx_chars, "context assembled");
        if let Some(limit) = self.context_warn_chars {
            if ctx_chars > limit {
                warn!(ctx_chars, limit, "context exceeds soft limit, sending as-is");
            }
        }

        let prompt = compose(question, &ctx.context, &ctx.notes);
        let raw = self.invoker.invoke(&prompt).await?;
        let groups = parse(raw)?;

        let batch = AnswerBatch::from_groups(question, &ctx.context, groups);
        persist_batch(self.store.as_ref(), &batch).await?;

        info!(
            groups = batch.len(),
            latency_ms = started.elapsed().as_millis(),
            "question answered"
        );
        Ok(Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::ANSWER_TOOL_NAME;
    use crate::testing::{FakeInvoker, FakeStore};
    use crate::types::{Note, PaperRecord, RetrievedChunk};
    use ai_llm_service::{ChatOutcome, ToolCall};
    use serde_json::json;

    const QUESTION: &str = "What is the main contribution?";
    const PAPER: &str = "arxiv.org/abs/1234";

    fn answer_call(answer: &str, followups: &[&str]) -> ToolCall {
        ToolCall {
            name: ANSWER_TOOL_NAME.into(),
            arguments: json!({ "answer": answer, "followupQuestions": followups }).to_string(),
        }
    }

    fn three_chunks() -> Vec<RetrievedChunk> {
        vec![
            RetrievedChunk::text("We propose X."),
            RetrievedChunk::text("X is evaluated on Y."),
            RetrievedChunk::text("Related work."),
        ]
    }

    fn paper_with_notes() -> Option<PaperRecord> {
        Some(PaperRecord {
            notes: Some(vec![Note::new("This paper proposes X.")]),
        })
    }

    fn orchestrator(store: &Arc<FakeStore>, invoker: &Arc<FakeInvoker>) -> QaOrchestrator {
        QaOrchestrator::new(store.clone(), invoker.clone())
    }

    #[tokio::test]
    async fn answers_and_persists_one_group() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![answer_call(
            "X",
            &["How is X evaluated?"],
        )])));

        let batch = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.records[0].answer, "X");
        assert_eq!(batch.records[0].followup_questions, vec!["How is X evaluated?"]);

        let saved = store.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].question, QUESTION);
        assert_eq!(saved[0].answer, "X");
        assert_eq!(saved[0].followup_questions, vec!["How is X evaluated?"]);
        assert_eq!(
            saved[0].context_snapshot,
            "We propose X.\n\nX is evaluated on Y.\n\nRelated work."
        );

        let searches = store.searches();
        assert_eq!(searches, vec![(QUESTION.to_string(), TOP_K, PAPER.to_string())]);

        let prompt = invoker.last_prompt().unwrap();
        assert!(prompt.user.contains("This paper proposes X."));
        assert!(prompt.user.contains(QUESTION));
    }

    #[tokio::test]
    async fn missing_paper_returns_none_without_model_or_saves() {
        let store = Arc::new(FakeStore::new(three_chunks(), None));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![])));

        let out = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap();

        assert!(out.is_none());
        assert_eq!(store.saved().len(), 0);
        assert_eq!(invoker.calls(), 0);
    }

    #[tokio::test]
    async fn absent_or_empty_notes_return_none() {
        for notes in [None, Some(vec![])] {
            let store = Arc::new(FakeStore::new(three_chunks(), Some(PaperRecord { notes })));
            let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![])));
            let out = orchestrator(&store, &invoker)
                .qa_on_paper(QUESTION, PAPER)
                .await
                .unwrap();
            assert!(out.is_none());
            assert!(store.saved().is_empty());
        }
    }

    #[tokio::test]
    async fn missing_answer_field_fails_without_saves() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![ToolCall {
            name: ANSWER_TOOL_NAME.into(),
            arguments: json!({ "followupQuestions": ["a?"] }).to_string(),
        }])));

        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Parse(_)));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn invocation_failure_is_surfaced_without_saves() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::failing("upstream 500"));

        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Invocation(_)));
        assert!(store.saved().is_empty());
    }

    #[tokio::test]
    async fn blank_paper_is_rejected_before_any_io() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![])));

        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, "   ")
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::InvalidRequest(_)));
        assert!(store.searches().is_empty());
    }

    #[tokio::test]
    async fn retrieval_and_lookup_failures_map_to_their_stage() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()).fail_search());
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![])));
        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::Retrieval(_)));

        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()).fail_lookup());
        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap_err();
        assert!(matches!(err, QaError::PaperLookup(_)));
    }

    #[tokio::test]
    async fn groups_and_followups_keep_model_order() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![
            answer_call("first", &["3", "1", "2"]),
            answer_call("second", &["z", "a"]),
        ])));

        let batch = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap()
            .unwrap();

        let answers: Vec<_> = batch.records.iter().map(|r| r.answer.as_str()).collect();
        assert_eq!(answers, vec!["first", "second"]);
        assert_eq!(batch.records[0].followup_questions, vec!["3", "1", "2"]);
        assert_eq!(batch.records[1].followup_questions, vec!["z", "a"]);
    }

    #[tokio::test]
    async fn repeated_question_creates_duplicate_records() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![answer_call(
            "X",
            &[],
        )])));
        let qa = orchestrator(&store, &invoker);

        qa.qa_on_paper(QUESTION, PAPER).await.unwrap();
        qa.qa_on_paper(QUESTION, PAPER).await.unwrap();

        let saved = store.saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0], saved[1]);
    }

    #[tokio::test]
    async fn one_failed_save_does_not_stop_the_others() {
        let store = Arc::new(FakeStore::new(three_chunks(), paper_with_notes()).fail_answer("B"));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![
            answer_call("A", &[]),
            answer_call("B", &[]),
            answer_call("C", &[]),
        ])));

        let err = orchestrator(&store, &invoker)
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap_err();

        assert!(matches!(err, QaError::Persistence(_)));
        assert_eq!(store.save_attempts(), 3);
        let answers: Vec<_> = store.saved().into_iter().map(|r| r.answer).collect();
        assert_eq!(answers, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn oversized_context_is_still_sent_whole() {
        let big = "x".repeat(2_000);
        let store = Arc::new(FakeStore::new(
            vec![RetrievedChunk::text(big.clone())],
            paper_with_notes(),
        ));
        let invoker = Arc::new(FakeInvoker::new(ChatOutcome::ToolCalls(vec![answer_call(
            "X",
            &[],
        )])));

        orchestrator(&store, &invoker)
            .with_context_warning(Some(100))
            .qa_on_paper(QUESTION, PAPER)
            .await
            .unwrap();

        assert!(invoker.last_prompt().unwrap().user.contains(&big));
        assert_eq!(store.saved()[0].context_snapshot, big);
    }
}

//! In-memory fakes for the store and invoker traits.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use ai_llm_service::{ChatOutcome, ChatPrompt};

use crate::error::QaError;
use crate::invoker::{InvokeFuture, StructuredAnswerInvoker};
use crate::store::{DocumentStore, PaperFilter, StoreError, StoreFuture};
use crate::types::{AnswerRecord, PaperRecord, RetrievedChunk};

pub struct FakeStore {
    chunks: Vec<RetrievedChunk>,
    paper: Option<PaperRecord>,
    fail_search: bool,
    fail_lookup: bool,
    fail_answer: Option<String>,
    searches: Mutex<Vec<(String, u64, String)>>,
    saved: Mutex<Vec<AnswerRecord>>,
    attempts: AtomicUsize,
    gate: Option<tokio::sync::Barrier>,
}

impl FakeStore {
    pub fn new(chunks: Vec<RetrievedChunk>, paper: Option<PaperRecord>) -> Self {
        Self {
            chunks,
            paper,
            fail_search: false,
            fail_lookup: false,
            gate: None,
            fail_answer: None,
            searches: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn fail_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn fail_lookup(mut self) -> Self {
        self.fail_lookup = true;
        self
    }

    /// Makes `save_qa` fail for records with this answer.
    pub fn fail_answer(mut self, answer: &str) -> Self {
        self.fail_answer = Some(answer.to_string());
        self
    }

    /// Holds every `save_qa` call until `writers` of them are in flight.
    pub fn gated(mut self, writers: usize) -> Self {
        self.gate = Some(tokio::sync::Barrier::new(writers));
        self
    }

    pub fn searches(&self) -> Vec<(String, u64, String)> {
        self.searches.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Vec<AnswerRecord> {
        self.saved.lock().unwrap().clone()
    }

    pub fn save_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DocumentStore for FakeStore {
    fn similarity_search<'a>(
        &'a self,
        query: &'a str,
        k: u64,
        filter: &'a PaperFilter,
    ) -> StoreFuture<'a, Vec<RetrievedChunk>> {
        Box::pin(async move {
            self.searches
                .lock()
                .unwrap()
                .push((query.to_string(), k, filter.name.clone()));
            if self.fail_search {
                return Err(StoreError("vector store unavailable".into()));
            }
            Ok(self.chunks.clone())
        })
    }

    fn get_paper<'a>(&'a self, _paper_url: &'a str) -> StoreFuture<'a, Option<PaperRecord>> {
        Box::pin(async move {
            if self.fail_lookup {
                return Err(StoreError("record store unavailable".into()));
            }
            Ok(self.paper.clone())
        })
    }

    fn save_qa<'a>(
        &'a self,
        question: &'a str,
        answer: &'a str,
        context_snapshot: &'a str,
        followup_questions: &'a [String],
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            match &self.gate {
                Some(gate) => {
                    gate.wait().await;
                }
                None => tokio::task::yield_now().await,
            }
            if self.fail_answer.as_deref() == Some(answer) {
                return Err(StoreError(format!("insert of '{answer}' rejected")));
            }
            self.saved.lock().unwrap().push(AnswerRecord {
                question: question.to_string(),
                answer: answer.to_string(),
                followup_questions: followup_questions.to_vec(),
                context_snapshot: context_snapshot.to_string(),
            });
            Ok(())
        })
    }
}

pub struct FakeInvoker {
    outcome: Result<ChatOutcome, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<ChatPrompt>>,
}

impl FakeInvoker {
    pub fn new(outcome: ChatOutcome) -> Self {
        Self {
            outcome: Ok(outcome),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            outcome: Err(msg.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<ChatPrompt> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl StructuredAnswerInvoker for FakeInvoker {
    fn invoke<'a>(&'a self, prompt: &'a ChatPrompt) -> InvokeFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.clone());
            self.outcome.clone().map_err(QaError::Invocation)
        })
    }
}

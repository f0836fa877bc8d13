//! Data carried through one question-answering request.

use serde::{Deserialize, Serialize};

/// A passage returned by similarity search, in store relevance order.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    /// Paper the chunk belongs to, when the store reports it.
    pub paper: Option<String>,
    pub position: Option<i64>,
    pub score: f32,
}

impl RetrievedChunk {
    /// Chunk with only text; metadata left empty.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            paper: None,
            position: None,
            score: 0.0,
        }
    }
}

/// Analytical note previously generated for a paper.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note: String,
    #[serde(rename = "pageNumbers", default)]
    pub page_numbers: Vec<u32>,
}

impl Note {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            page_numbers: Vec::new(),
        }
    }
}

/// Stored paper record. `notes: None` means the notes pipeline has not run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaperRecord {
    pub notes: Option<Vec<Note>>,
}

/// One answer group produced by the model through the `questionAnswer` tool.
///
/// Both fields are required; a tool call missing either is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerGroup {
    pub answer: String,
    #[serde(rename = "followupQuestions")]
    pub followup_questions: Vec<String>,
}

/// What gets persisted for one answer group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: String,
    pub answer: String,
    pub followup_questions: Vec<String>,
    /// Exact context text the model saw.
    pub context_snapshot: String,
}

/// All answer groups for one question, in model order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerBatch {
    pub records: Vec<AnswerRecord>,
}

impl AnswerBatch {
    /// Builds records that share `question` and `context_snapshot`.
    pub fn from_groups(question: &str, context_snapshot: &str, groups: Vec<AnswerGroup>) -> Self {
        let records = groups
            .into_iter()
            .map(|g| AnswerRecord {
                question: question.to_string(),
                answer: g.answer,
                followup_questions: g.followup_questions,
                context_snapshot: context_snapshot.to_string(),
            })
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The groups as returned to HTTP callers (`answer`, `followupQuestions`).
    pub fn groups(&self) -> Vec<AnswerGroup> {
        self.records
            .iter()
            .map(|r| AnswerGroup {
                answer: r.answer.clone(),
                followup_questions: r.followup_questions.clone(),
            })
            .collect()
    }
}

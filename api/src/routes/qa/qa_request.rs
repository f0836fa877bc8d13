use paper_qa::AnswerGroup;
use serde::Deserialize;

/// Request payload for /qa.
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    /// Paper identifier (its URL), as stored by the notes pipeline.
    #[serde(rename = "paperUrl")]
    pub paper_url: String,
    /// Natural language question.
    pub question: String,
}

/// Response payload for /qa: the answer groups, or `null` when the paper or
/// its notes are unknown.
pub type QaResponse = Option<Vec<AnswerGroup>>;

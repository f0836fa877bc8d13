//! Row shapes of the `arxiv_papers` and `arxiv_question_answering` tables.

use serde::{Deserialize, Serialize};

/// One note as written by the notes pipeline into `arxiv_papers.notes`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NoteRow {
    pub note: String,
    #[serde(rename = "pageNumbers", default)]
    pub page_numbers: Vec<u32>,
}

/// A row of the papers table. Only the columns the QA flow reads.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PaperRow {
    pub arxiv_url: String,
    #[serde(default)]
    pub name: Option<String>,
    /// `NULL` in the table maps to `None`.
    #[serde(default)]
    pub notes: Option<Vec<NoteRow>>,
}

/// Insert payload for the question/answer table.
#[derive(Clone, Debug, Serialize)]
pub struct QaInsert<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub context: &'a str,
    pub followup_questions: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paper_row_decodes_notes_with_pages() {
        let raw = json!({
            "arxiv_url": "arxiv.org/abs/1234",
            "name": "arxiv.org/abs/1234",
            "paper": "ignored",
            "notes": [
                { "note": "This paper proposes X.", "pageNumbers": [1, 2] },
                { "note": "X beats Y." }
            ]
        });
        let row: PaperRow = serde_json::from_value(raw).unwrap();
        let notes = row.notes.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].page_numbers, vec![1, 2]);
        assert!(notes[1].page_numbers.is_empty());
    }

    #[test]
    fn null_notes_decode_as_none() {
        let row: PaperRow =
            serde_json::from_value(json!({ "arxiv_url": "u", "notes": null })).unwrap();
        assert!(row.notes.is_none());
    }

    #[test]
    fn qa_insert_uses_table_column_names() {
        let followups = vec!["How is X evaluated?".to_string()];
        let row = QaInsert {
            question: "q",
            answer: "a",
            context: "c",
            followup_questions: &followups,
        };
        assert_eq!(
            serde_json::to_value(row).unwrap(),
            json!({
                "question": "q",
                "answer": "a",
                "context": "c",
                "followup_questions": ["How is X evaluated?"]
            })
        );
    }
}

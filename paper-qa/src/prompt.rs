//! Fixed prompt template for answering a question about one paper.

use ai_llm_service::ChatPrompt;

use crate::invoker::ANSWER_TOOL_NAME;

pub const QA_SYSTEM: &str = r#"You are a tenured professor of computer science helping a student with their research.
The student has a question regarding a paper they are reading.
Here are their notes on the paper and some relevant excerpts from the paper.
Answer the question using the notes and excerpts as ground truth.
Always reply by calling the `questionAnswer` tool. You may call it more than once when the question has several distinct answers.
Each call carries one answer and a list of follow-up questions the student could ask next."#;

/// Renders the three-slot user message: excerpts, notes, question.
pub fn compose(question: &str, context_text: &str, notes_text: &str) -> ChatPrompt {
    let user = format!(
        "Relevant documents:\n{context_text}\n\n\
         Notes:\n{notes_text}\n\n\
         Question: {question}\n\n\
         Answer through the `{ANSWER_TOOL_NAME}` tool."
    );
    ChatPrompt {
        system: Some(QA_SYSTEM.to_string()),
        user,
    }
}

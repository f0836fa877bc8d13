//! Validates raw model output against the answer schema.

use ai_llm_service::ChatOutcome;
use tracing::warn;

use crate::error::QaError;
use crate::invoker::ANSWER_TOOL_NAME;
use crate::types::AnswerGroup;

/// Converts tool calls into answer groups, one per call, in call order.
///
/// # Errors
/// [`QaError::Parse`] for free text, zero calls, a call to another tool,
/// non-JSON arguments, or missing/mistyped `answer` / `followupQuestions`.
pub fn parse(raw: ChatOutcome) -> Result<Vec<AnswerGroup>, QaError> {
    let calls = match raw {
        ChatOutcome::ToolCalls(calls) => calls,
        ChatOutcome::Text(text) => {
            warn!(text_len = text.len(), "model replied with free text");
            return Err(QaError::Parse(
                "model replied with free text instead of a tool call".into(),
            ));
        }
    };

    if calls.is_empty() {
        return Err(QaError::Parse("model returned no tool calls".into()));
    }

    calls
        .into_iter()
        .enumerate()
        .map(|(i, call)| {
            if call.name != ANSWER_TOOL_NAME {
                return Err(QaError::Parse(format!(
                    "tool call #{i} targets unknown tool '{}'",
                    call.name
                )));
            }
            serde_json::from_str::<AnswerGroup>(&call.arguments)
                .map_err(|e| QaError::Parse(format!("tool call #{i}: {e}")))
        })
        .collect()
}

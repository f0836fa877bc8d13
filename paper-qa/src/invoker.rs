//! Structured model invocation: one tool schema, output as tool calls.

use std::{future::Future, pin::Pin, sync::Arc, time::Instant};

use ai_llm_service::{
    ChatOutcome, ChatPrompt, LlmModelConfig, LlmServiceProfiles, ToolChoice, ToolSpec,
};
use serde_json::json;
use tracing::{Instrument, debug, error, info_span};

use crate::error::QaError;

/// Name of the single tool the model answers through.
pub const ANSWER_TOOL_NAME: &str = "questionAnswer";

/// JSON schema of one answer group: `answer` plus ordered `followupQuestions`.
pub fn answer_tool() -> ToolSpec {
    ToolSpec {
        name: ANSWER_TOOL_NAME.to_string(),
        description: "The answer to the question".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "answer": {
                    "type": "string",
                    "description": "The answer to the question"
                },
                "followupQuestions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Followup questions the student should also ask"
                }
            },
            "required": ["answer", "followupQuestions"]
        }),
    }
}

/// Everything the invoker needs, injected instead of read from globals.
#[derive(Clone, Debug, PartialEq)]
pub struct InvokerConfig {
    pub model: LlmModelConfig,
    pub tool: ToolSpec,
    pub choice: ToolChoice,
}

impl InvokerConfig {
    /// Pins temperature to `0.0` and binds the `questionAnswer` tool with
    /// automatic tool choice.
    pub fn new(model: LlmModelConfig) -> Self {
        Self {
            model: model.with_temperature(0.0),
            tool: answer_tool(),
            choice: ToolChoice::Auto,
        }
    }
}

pub type InvokeFuture<'a> = Pin<Box<dyn Future<Output = Result<ChatOutcome, QaError>> + Send + 'a>>;

/// Sends a composed prompt and returns the raw model output.
pub trait StructuredAnswerInvoker: Send + Sync {
    fn invoke<'a>(&'a self, prompt: &'a ChatPrompt) -> InvokeFuture<'a>;
}

/// Invoker backed by the shared LLM service. No retry.
#[derive(Clone, Debug)]
pub struct LlmAnswerInvoker {
    svc: Arc<LlmServiceProfiles>,
    cfg: InvokerConfig,
}

impl LlmAnswerInvoker {
    pub fn new(svc: Arc<LlmServiceProfiles>, cfg: InvokerConfig) -> Self {
        Self { svc, cfg }
    }
}

impl StructuredAnswerInvoker for LlmAnswerInvoker {
    fn invoke<'a>(&'a self, prompt: &'a ChatPrompt) -> InvokeFuture<'a> {
        let span = info_span!("invoke_answer_model", model = %self.cfg.model.model);
        Box::pin(
            async move {
                let started = Instant::now();
                let tools = std::slice::from_ref(&self.cfg.tool);
                let out = self
                    .svc
                    .chat_with_tools_using(&self.cfg.model, prompt, tools, self.cfg.choice)
                    .await
                    .map_err(|e| {
                        error!(error = %e, "answer model call failed");
                        QaError::from(e)
                    })?;
                debug!(
                    latency_ms = started.elapsed().as_millis(),
                    "answer model call completed"
                );
                Ok(out)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_llm_service::LlmProvider;

    fn model() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-4-1106-preview".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(120),
        }
    }

    #[test]
    fn config_pins_temperature_and_binds_one_tool() {
        let cfg = InvokerConfig::new(model());
        assert_eq!(cfg.model.temperature, Some(0.0));
        assert_eq!(cfg.tool.name, ANSWER_TOOL_NAME);
        assert_eq!(cfg.choice, ToolChoice::Auto);
    }

    #[test]
    fn tool_schema_requires_both_fields() {
        let tool = answer_tool();
        assert_eq!(
            tool.parameters["required"],
            json!(["answer", "followupQuestions"])
        );
        assert_eq!(
            tool.parameters["properties"]["followupQuestions"]["items"]["type"],
            "string"
        );
    }

    #[tokio::test]
    async fn provider_error_becomes_invocation_error() {
        // OpenAI without an API key fails before any I/O.
        let mut bad = model();
        bad.api_key = None;
        let svc = Arc::new(LlmServiceProfiles::new(bad.clone(), bad.clone()));
        let inv = LlmAnswerInvoker::new(svc, InvokerConfig::new(bad));
        let prompt = ChatPrompt {
            system: None,
            user: "q".into(),
        };
        let err = inv.invoke(&prompt).await.unwrap_err();
        assert!(matches!(err, QaError::Invocation(_)));
    }
}

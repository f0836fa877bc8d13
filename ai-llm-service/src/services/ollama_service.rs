//! Lightweight Ollama service for tool-calling chat and embeddings.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat`       — chat with `tools` (`stream=false`)
//! - `POST {endpoint}/api/embeddings` — embeddings retrieval
//!
//! Ollama has no `tool_choice`; the model always decides on its own, which
//! matches the `auto` policy used by the QA pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    chat::{ChatOutcome, ChatPrompt, ToolCall, ToolChoice, ToolSpec},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for Ollama.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses an HTTP client with
/// a configurable timeout.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not `Ollama`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/api/chat", base);
        let url_embeddings = format!("{}/api/embeddings", base);

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** chat request via `/api/chat` with tools.
    ///
    /// Mapped options:
    /// - `temperature` ← `self.cfg.temperature`
    /// - `top_p`       ← `self.cfg.top_p`
    /// - `num_predict` ← `self.cfg.max_tokens`
    ///
    /// Tool call arguments arrive as JSON objects and are re-serialized to
    /// text so callers see the same shape for every provider.
    #[instrument(skip_all, fields(model = %self.cfg.model, tools = tools.len()))]
    pub async fn chat_with_tools(
        &self,
        prompt: &ChatPrompt,
        tools: &[ToolSpec],
        choice: ToolChoice,
    ) -> Result<ChatOutcome, AiLlmError> {
        if choice == ToolChoice::Required {
            warn!("Ollama does not support tool_choice=required, falling back to auto");
        }
        let body = ChatRequest::from_cfg(&self.cfg, prompt, tools);

        debug!("POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet: make_snippet(&text),
                }),
            )
            .into());
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; ensure `stream=false` is used"
                )),
            )
        })?;

        Ok(out.into_outcome()?)
    }

    /// Retrieves embeddings via `/api/embeddings`.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet: make_snippet(&text),
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ embedding: number[] }}`"
                )),
            )
        })?;

        Ok(out.embedding)
    }
}

/* ==========================
HTTP payloads & options
========================== */

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDef<'a>>,
    options: ChatOptions,
}

impl<'a> ChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a ChatPrompt, tools: &'a [ToolSpec]) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = prompt.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.user,
        });

        Self {
            model: &cfg.model,
            messages,
            stream: false,
            tools: tools
                .iter()
                .map(|t| ToolDef {
                    kind: "function",
                    function: t,
                })
                .collect(),
            options: ChatOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ToolDef<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolSpec,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessageOut>,
}

impl ChatResponse {
    fn into_outcome(self) -> Result<ChatOutcome, ProviderError> {
        let message = self
            .message
            .ok_or_else(|| ProviderError::new(Provider::Ollama, ProviderErrorKind::EmptyChoices))?;

        let calls: Vec<ToolCall> = message
            .tool_calls
            .into_iter()
            .map(|c| ToolCall {
                name: c.function.name,
                arguments: match c.function.arguments {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            })
            .collect();

        if calls.is_empty() {
            Ok(ChatOutcome::Text(message.content))
        } else {
            Ok(ChatOutcome::ToolCalls(calls))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ToolCallOut>,
}

#[derive(Debug, Deserialize)]
struct ToolCallOut {
    function: FunctionOut,
}

#[derive(Debug, Deserialize)]
struct FunctionOut {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_arguments_are_reserialized() {
        let raw = json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [
                    { "function": { "name": "questionAnswer",
                                    "arguments": { "answer": "X", "followupQuestions": [] } } }
                ]
            }
        });
        let resp: ChatResponse = serde_json::from_value(raw).unwrap();
        let ChatOutcome::ToolCalls(calls) = resp.into_outcome().unwrap() else {
            panic!("expected tool calls");
        };
        let args: Value = serde_json::from_str(&calls[0].arguments).unwrap();
        assert_eq!(args["answer"], json!("X"));
    }

    #[test]
    fn message_without_calls_is_text() {
        let raw = json!({ "message": { "role": "assistant", "content": "hello" } });
        let resp: ChatResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(resp.into_outcome().unwrap(), ChatOutcome::Text("hello".into()));
    }

    #[test]
    fn request_maps_sampling_options() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "qwen3:14b".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: None,
        };
        let prompt = ChatPrompt {
            system: None,
            user: "q".into(),
        };
        let req = ChatRequest::from_cfg(&cfg, &prompt, &[]);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["stream"], json!(false));
        assert_eq!(v["options"]["num_predict"], json!(256));
        assert!(v.get("tools").is_none());
        assert_eq!(v["messages"].as_array().unwrap().len(), 1);
    }
}

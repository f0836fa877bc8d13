//! OpenAI (ChatGPT) service for tool-calling chat and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions — chat completion with `tools`
//! - POST {endpoint}/v1/embeddings       — embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    chat::{ChatOutcome, ChatPrompt, ToolCall, ToolChoice, ToolSpec},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

/// Thin client for the OpenAI API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not OpenAI
    /// - `MissingApiKey` if `cfg.api_key` is `None`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(
                ProviderError::new(Provider::OpenAI, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let api_key = cfg.api_key.clone().ok_or_else(|| {
            ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey)
        })?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::new(
                    Provider::OpenAI,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);
        let url_embeddings = format!("{}/v1/embeddings", base);

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** chat completion with tools attached.
    ///
    /// Mapped options from config: `model`, `temperature`, `top_p`, `max_tokens`.
    /// The first choice decides the outcome: tool calls (in emission order)
    /// win over `content`; a message with neither is an `EmptyChoices` error.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - `Decode` if the JSON cannot be parsed
    /// - `EmptyChoices` if no usable choice is returned
    #[instrument(skip_all, fields(model = %self.cfg.model, tools = tools.len()))]
    pub async fn chat_with_tools(
        &self,
        prompt: &ChatPrompt,
        tools: &[ToolSpec],
        choice: ToolChoice,
    ) -> Result<ChatOutcome, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, tools, choice);

        debug!(
            prompt_len = prompt.user.len(),
            has_system = prompt.system.is_some(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/chat/completions returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode /v1/chat/completions response"
            );
            ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `choices[0].message`"
                )),
            )
        })?;

        let outcome = out.into_outcome()?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            tool_calls = match &outcome {
                ChatOutcome::ToolCalls(calls) => calls.len(),
                ChatOutcome::Text(_) => 0,
            },
            "chat completion completed"
        );

        Ok(outcome)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - `Decode` if the JSON cannot be parsed or `data` is empty
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(input_len = input.len(), "POST {}", self.url_embeddings);

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
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI /v1/embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `data[0].embedding`"
                )),
            )
        })?;

        let first = out.data.into_iter().next().ok_or_else(|| {
            ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::Decode("empty `data` in embeddings response".into()),
            )
        })?;

        debug!(
            latency_ms = started.elapsed().as_millis(),
            dim = first.embedding.len(),
            "embeddings completed"
        );

        Ok(first.embedding)
    }
}

/* ===========================================================================
HTTP payloads & options
======================================================================== */

/// Request body for `/v1/chat/completions` (non-streaming, with tools).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolDef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(
        cfg: &'a LlmModelConfig,
        prompt: &'a ChatPrompt,
        tools: &'a [ToolSpec],
        choice: ToolChoice,
    ) -> Self {
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

        let tools: Vec<ToolDef<'a>> = tools
            .iter()
            .map(|t| ToolDef {
                kind: "function",
                function: t,
            })
            .collect();
        let tool_choice = (!tools.is_empty()).then(|| choice.as_str());

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
            tools,
            tool_choice,
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

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    fn into_outcome(self) -> Result<ChatOutcome, ProviderError> {
        let message = self
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::EmptyChoices))?;

        let calls: Vec<ToolCall> = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|c| ToolCall {
                name: c.function.name,
                arguments: c.function.arguments,
            })
            .collect();

        if !calls.is_empty() {
            return Ok(ChatOutcome::ToolCalls(calls));
        }
        match message.content {
            Some(text) => Ok(ChatOutcome::Text(text)),
            None => Err(ProviderError::new(
                Provider::OpenAI,
                ProviderErrorKind::EmptyChoices,
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallOut>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallOut {
    function: FunctionOut,
}

#[derive(Debug, Deserialize)]
struct FunctionOut {
    name: String,
    /// OpenAI returns the arguments object as a JSON-encoded string.
    arguments: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg() -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-4-1106-preview".into(),
            endpoint: "https://api.openai.com/".into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(10),
        }
    }

    fn tool() -> ToolSpec {
        ToolSpec {
            name: "questionAnswer".into(),
            description: "answer".into(),
            parameters: json!({ "type": "object" }),
        }
    }

    #[test]
    fn request_carries_tools_and_auto_choice() {
        let cfg = cfg();
        let prompt = ChatPrompt {
            system: Some("sys".into()),
            user: "hi".into(),
        };
        let tools = vec![tool()];
        let req = ChatCompletionRequest::from_cfg(&cfg, &prompt, &tools, ToolChoice::Auto);
        let v = serde_json::to_value(&req).unwrap();

        assert_eq!(v["temperature"], json!(0.0));
        assert_eq!(v["tool_choice"], json!("auto"));
        assert_eq!(v["tools"][0]["type"], json!("function"));
        assert_eq!(v["tools"][0]["function"]["name"], json!("questionAnswer"));
        assert_eq!(v["messages"][0]["role"], json!("system"));
        assert_eq!(v["messages"][1]["content"], json!("hi"));
        assert!(v.get("max_tokens").is_none());
    }

    #[test]
    fn tool_calls_keep_emission_order() {
        let raw = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        { "id": "a", "type": "function",
                          "function": { "name": "questionAnswer", "arguments": "{\"n\":1}" } },
                        { "id": "b", "type": "function",
                          "function": { "name": "questionAnswer", "arguments": "{\"n\":2}" } }
                    ]
                }
            }]
        });
        let resp: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        match resp.into_outcome().unwrap() {
            ChatOutcome::ToolCalls(calls) => {
                assert_eq!(calls.len(), 2);
                assert_eq!(calls[0].arguments, "{\"n\":1}");
                assert_eq!(calls[1].arguments, "{\"n\":2}");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn plain_content_becomes_text() {
        let raw = json!({ "choices": [{ "message": { "content": "just text" } }] });
        let resp: ChatCompletionResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(
            resp.into_outcome().unwrap(),
            ChatOutcome::Text("just text".into())
        );
    }

    #[test]
    fn empty_choices_is_an_error() {
        let resp: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(resp.into_outcome().is_err());
    }

    #[test]
    fn constructor_rejects_wrong_provider() {
        let mut c = cfg();
        c.provider = LlmProvider::Ollama;
        assert!(OpenAiService::new(c).is_err());
    }
}

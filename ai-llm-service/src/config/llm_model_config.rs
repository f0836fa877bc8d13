use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{AiLlmError, ConfigError, validate_http_endpoint, validate_range_f32},
};

/// Configuration for an LLM model invocation.
///
/// - `provider`: which backend to call (OpenAI, Ollama).
/// - `model`: model identifier (e.g. `"gpt-4-1106-preview"`).
/// - `endpoint`: base URL without the API path.
/// - `api_key`: required by OpenAI, ignored by Ollama.
/// - `max_tokens`, `temperature`, `top_p`: sampling knobs, sent only when set.
/// - `timeout_secs`: per-request HTTP timeout of the underlying client.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-4-1106-preview".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: None,
///     temperature: Some(0.0),
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// Optional API key for authentication (e.g., OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 = deterministic).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Returns a copy with the temperature pinned to `value`.
    pub fn with_temperature(mut self, value: f32) -> Self {
        self.temperature = Some(value);
        self
    }

    /// Validates model name, endpoint scheme and sampling ranges.
    pub fn validate(&self) -> Result<(), AiLlmError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }
        validate_http_endpoint("endpoint", &self.endpoint)?;
        if let Some(t) = self.temperature {
            validate_range_f32("temperature", t, 0.0, 2.0)?;
        }
        if let Some(p) = self.top_p {
            validate_range_f32("top_p", p, 0.0, 1.0)?;
        }
        if self.provider == LlmProvider::OpenAI && self.api_key.is_none() {
            return Err(ConfigError::MissingVar("OPENAI_API_KEY").into());
        }
        Ok(())
    }
}

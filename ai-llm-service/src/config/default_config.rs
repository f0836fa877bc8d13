//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are used by the backend:
//!
//! - **Chat**      → the model that answers questions through a tool schema
//! - **Embedding** → embedding generator for similarity search
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = provider kind (`openai` | `ollama`, default `openai`)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64, default 120)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` (mandatory)
//! - `OPENAI_URL`     (default `https://api.openai.com`)
//! - `QA_MODEL`       (default `gpt-4-1106-preview`)
//! - `EMBEDDING_MODEL` (default `text-embedding-ada-002`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, env_opt, env_opt_u32, env_opt_u64, must_env},
};

/// Default chat model, matching what the notes pipeline was tuned against.
pub const DEFAULT_OPENAI_CHAT_MODEL: &str = "gpt-4-1106-preview";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Reads `LLM_KIND` (default `openai`).
pub fn provider_from_env() -> Result<LlmProvider, AiLlmError> {
    match env_opt("LLM_KIND") {
        Some(kind) => Ok(kind.parse::<LlmProvider>()?),
        None => Ok(LlmProvider::OpenAI),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Constructs the config for the **chat** model that answers questions.
///
/// The temperature is left at `0.0`; callers that need deterministic output
/// pin it again explicitly.
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?;
    let timeout_secs = env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    let cfg = match provider_from_env()? {
        LlmProvider::OpenAI => LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: env_opt("QA_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_CHAT_MODEL.into()),
            endpoint: env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs,
        },
        LlmProvider::Ollama => LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_env("OLLAMA_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs,
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the config for the **embedding** model.
///
/// Must be the same model that embedded the stored chunks, otherwise the
/// similarity search compares vectors from different spaces.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let cfg = match provider_from_env()? {
        LlmProvider::OpenAI => LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: env_opt("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.into()),
            endpoint: env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into()),
            api_key: Some(must_env("OPENAI_API_KEY")?),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(30),
        },
        LlmProvider::Ollama => LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: must_env("EMBEDDING_MODEL")?,
            endpoint: ollama_endpoint()?,
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(30),
        },
    };
    cfg.validate()?;
    Ok(cfg)
}

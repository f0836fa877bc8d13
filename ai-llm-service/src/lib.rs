//! Shared LLM service used by the paper QA backend.
//!
//! - [`config`]: model/provider configuration and env-driven defaults
//! - [`chat`]: provider-agnostic prompt, tool schema and chat outcome types
//! - [`services`]: thin HTTP clients (OpenAI, Ollama)
//! - [`service_profiles`]: cached clients for the `chat` and `embedding` profiles
//! - [`error_handler`]: unified error type and env helpers
//! - [`telemetry`]: tracing layers for the workspace

pub mod chat;
pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use chat::{ChatOutcome, ChatPrompt, ToolCall, ToolChoice, ToolSpec};
pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use service_profiles::LlmServiceProfiles;

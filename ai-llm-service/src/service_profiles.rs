//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+timeout).
//! - Callers may pass an explicit [`LlmModelConfig`] to override the chat
//!   profile for one call; the client cache still applies.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{ChatPrompt, LlmServiceProfiles, ToolChoice};
//! use ai_llm_service::config::default_config::{config_chat, config_embedding};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(config_chat()?, config_embedding()?));
//! let prompt = ChatPrompt { system: None, user: "Hello".into() };
//! let out = svc.chat_with_tools(&prompt, &[], ToolChoice::Auto).await?;
//! println!("{out:?}");
//! let emb = svc.embed("Ferris").await?;
//! println!("Embedding dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    chat::{ChatOutcome, ChatPrompt, ToolChoice, ToolSpec},
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl std::fmt::Debug for LlmServiceProfiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmServiceProfiles")
            .field("chat", &self.chat.model)
            .field("embedding", &self.embedding.model)
            .finish()
    }
}

impl LlmServiceProfiles {
    /// Creates a new service from the two profiles. Clients are built lazily.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Chat completion with tools using the **chat** profile.
    pub async fn chat_with_tools(
        &self,
        prompt: &ChatPrompt,
        tools: &[ToolSpec],
        choice: ToolChoice,
    ) -> Result<ChatOutcome, AiLlmError> {
        self.chat_with_tools_using(&self.chat, prompt, tools, choice)
            .await
    }

    /// Chat completion with tools using an explicit model config.
    pub async fn chat_with_tools_using(
        &self,
        cfg: &LlmModelConfig,
        prompt: &ChatPrompt,
        tools: &[ToolSpec],
        choice: ToolChoice,
    ) -> Result<ChatOutcome, AiLlmError> {
        match cfg.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(cfg).await?;
                cli.chat_with_tools(prompt, tools, choice).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(cfg).await?;
                cli.chat_with_tools(prompt, tools, choice).await
            }
        }
    }

    /// Computes embeddings using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAI => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn get_or_init_openai(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
///
/// Sampling knobs are not part of the key: they travel in each request body,
/// while the HTTP client only depends on where and how to connect.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

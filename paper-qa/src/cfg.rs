//! Runtime configuration loaded from environment variables.

use ai_llm_service::{
    LlmModelConfig,
    config::default_config::{config_chat, config_embedding},
    error_handler::env_opt_usize,
};
use paper_store::PaperStoreConfig;
use rag_store::RagConfig;

use crate::error::QaError;

/// Everything needed to wire a production [`crate::QaOrchestrator`].
#[derive(Clone, Debug)]
pub struct QaConfig {
    /// Answer model profile (temperature is pinned to `0.0` by the invoker).
    pub chat: LlmModelConfig,
    /// Must match the model that embedded the stored chunks.
    pub embedding: LlmModelConfig,
    pub rag: RagConfig,
    pub papers: PaperStoreConfig,
    /// `QA_CONTEXT_WARN_CHARS`: soft limit, only logged.
    pub context_warn_chars: Option<usize>,
}

impl QaConfig {
    pub fn from_env() -> Result<Self, QaError> {
        let chat = config_chat().map_err(|e| QaError::Config(e.to_string()))?;
        let embedding = config_embedding().map_err(|e| QaError::Config(e.to_string()))?;
        let rag = RagConfig::from_env().map_err(|e| QaError::Config(e.to_string()))?;
        let papers = PaperStoreConfig::from_env().map_err(|e| QaError::Config(e.to_string()))?;
        let context_warn_chars = env_opt_usize("QA_CONTEXT_WARN_CHARS")
            .map_err(|e| QaError::Config(e.to_string()))?;

        Ok(Self {
            chat,
            embedding,
            rag,
            papers,
            context_warn_chars,
        })
    }
}

use paper_qa::QaOrchestrator;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Question-answering pipeline, stateless across requests.
    pub qa: QaOrchestrator,
}

impl AppState {
    pub fn new(qa: QaOrchestrator) -> Self {
        Self { qa }
    }

    /// Builds the production pipeline from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let qa = paper_qa::build_from_env().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self::new(qa))
    }
}

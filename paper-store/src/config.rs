//! Environment-driven configuration for the PostgREST client.

use ai_llm_service::error_handler::{env_opt, env_opt_u64, must_env};

use crate::errors::{PaperStoreError, StoreResult};

pub const DEFAULT_PAPERS_TABLE: &str = "arxiv_papers";
pub const DEFAULT_QA_TABLE: &str = "arxiv_question_answering";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the Supabase/PostgREST endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct PaperStoreConfig {
    /// Project URL, e.g. `https://xyz.supabase.co` (no `/rest/v1` suffix).
    pub base_url: String,
    /// Service key; sent as `apikey` and as bearer token.
    pub api_key: String,
    pub papers_table: String,
    pub qa_table: String,
    pub timeout_secs: u64,
}

impl PaperStoreConfig {
    /// Config with default table names and timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            papers_table: DEFAULT_PAPERS_TABLE.to_string(),
            qa_table: DEFAULT_QA_TABLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads `SUPABASE_URL`, `SUPABASE_KEY` (required), `PAPERS_TABLE`,
    /// `QA_TABLE` and `PAPER_STORE_TIMEOUT_SECS` (optional).
    ///
    /// # Errors
    /// Returns [`PaperStoreError::Config`] for missing or invalid values.
    pub fn from_env() -> StoreResult<Self> {
        let base_url = must_env("SUPABASE_URL")?;
        let api_key = must_env("SUPABASE_KEY")?;

        let mut cfg = Self::new(base_url, api_key);
        if let Some(t) = env_opt("PAPERS_TABLE") {
            cfg.papers_table = t;
        }
        if let Some(t) = env_opt("QA_TABLE") {
            cfg.qa_table = t;
        }
        if let Some(secs) = env_opt_u64("PAPER_STORE_TIMEOUT_SECS")? {
            cfg.timeout_secs = secs;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> StoreResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(PaperStoreError::Config(format!(
                "base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(PaperStoreError::Config("api_key is empty".into()));
        }
        if self.papers_table.trim().is_empty() || self.qa_table.trim().is_empty() {
            return Err(PaperStoreError::Config("table names must be non-empty".into()));
        }
        Ok(())
    }

    /// `{base}/rest/v1/{table}`
    pub(crate) fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_strips_trailing_slash() {
        let cfg = PaperStoreConfig::new("https://xyz.supabase.co/", "k");
        assert_eq!(
            cfg.table_url(&cfg.papers_table),
            "https://xyz.supabase.co/rest/v1/arxiv_papers"
        );
    }

    #[test]
    fn validate_rejects_bad_url_and_empty_key() {
        assert!(PaperStoreConfig::new("xyz.supabase.co", "k").validate().is_err());
        assert!(PaperStoreConfig::new("https://x", "  ").validate().is_err());
        assert!(PaperStoreConfig::new("https://x", "k").validate().is_ok());
    }

    #[test]
    fn env_errors_become_config_errors() {
        let missing = must_env("PAPER_STORE_TEST_NEVER_SET").map_err(PaperStoreError::from);
        match missing {
            Err(PaperStoreError::Config(msg)) => {
                assert!(msg.contains("PAPER_STORE_TEST_NEVER_SET"), "{msg}")
            }
            other => panic!("expected config error, got {other:?}"),
        }
        assert_eq!(env_opt_u64("PAPER_STORE_TEST_NEVER_SET").unwrap(), None);
    }
}

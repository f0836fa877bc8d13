//! PostgREST (Supabase) client for paper records and QA inserts.
//!
//! Endpoints used:
//! - GET  /rest/v1/{papers_table}?arxiv_url=eq.{url}&select=*&limit=1
//! - POST /rest/v1/{qa_table}   (Prefer: return=minimal)

use std::time::{Duration, Instant};

use reqwest::{Client, header};
use tracing::{debug, error, info, instrument};

use crate::config::PaperStoreConfig;
use crate::errors::{PaperStoreError, StoreResult};
use crate::rows::{PaperRow, QaInsert};

#[derive(Debug, Clone)]
pub struct PaperStoreClient {
    http: Client,
    cfg: PaperStoreConfig,
    url_papers: String,
    url_qa: String,
}

impl PaperStoreClient {
    /// Builds a client with auth headers and timeout from `cfg`.
    ///
    /// # Errors
    /// - [`PaperStoreError::Config`] if the config is invalid
    /// - [`PaperStoreError::Http`] if the HTTP client cannot be built
    pub fn new(cfg: PaperStoreConfig) -> StoreResult<Self> {
        cfg.validate()?;

        let key = header::HeaderValue::from_str(cfg.api_key.trim())
            .map_err(|e| PaperStoreError::Config(format!("invalid api key header: {e}")))?;
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key.trim()))
            .map_err(|e| PaperStoreError::Config(format!("invalid api key header: {e}")))?;

        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(header::AUTHORIZATION, bearer);

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .default_headers(headers)
            .build()?;

        let url_papers = cfg.table_url(&cfg.papers_table);
        let url_qa = cfg.table_url(&cfg.qa_table);

        info!(
            papers = %url_papers,
            qa = %url_qa,
            timeout_secs = cfg.timeout_secs,
            "PaperStoreClient initialized"
        );

        Ok(Self {
            http,
            cfg,
            url_papers,
            url_qa,
        })
    }

    pub fn config(&self) -> &PaperStoreConfig {
        &self.cfg
    }

    /// Fetches the paper row whose `arxiv_url` equals `paper_url`.
    ///
    /// Returns `Ok(None)` when no row matches.
    #[instrument(skip(self))]
    pub async fn get_paper(&self, paper_url: &str) -> StoreResult<Option<PaperRow>> {
        let started = Instant::now();
        let resp = self
            .http
            .get(&self.url_papers)
            .query(&paper_query(paper_url))
            .send()
            .await?;

        let resp = check_status(resp, &self.url_papers).await?;
        let rows: Vec<PaperRow> = resp
            .json()
            .await
            .map_err(|e| PaperStoreError::Decode(format!("paper rows: {e}")))?;

        debug!(
            rows = rows.len(),
            latency_ms = started.elapsed().as_millis(),
            "paper lookup completed"
        );
        Ok(rows.into_iter().next())
    }

    /// Inserts one question/answer row. Every call creates a new row.
    #[instrument(skip_all, fields(followups = followup_questions.len()))]
    pub async fn save_qa(
        &self,
        question: &str,
        answer: &str,
        context: &str,
        followup_questions: &[String],
    ) -> StoreResult<()> {
        let started = Instant::now();
        let row = QaInsert {
            question,
            answer,
            context,
            followup_questions,
        };

        let resp = self
            .http
            .post(&self.url_qa)
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;
        check_status(resp, &self.url_qa).await?;

        debug!(
            latency_ms = started.elapsed().as_millis(),
            "qa row inserted"
        );
        Ok(())
    }
}

/// PostgREST query for an exact `arxiv_url` match.
fn paper_query(paper_url: &str) -> [(&'static str, String); 3] {
    [
        ("arxiv_url", format!("eq.{paper_url}")),
        ("select", "*".to_string()),
        ("limit", "1".to_string()),
    ]
}

async fn check_status(resp: reqwest::Response, url: &str) -> StoreResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let snippet = snippet(&text);
    error!(%status, %url, %snippet, "PostgREST returned non-success status");
    Err(PaperStoreError::Status {
        status,
        url: url.to_string(),
        snippet,
    })
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let one_line = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if one_line.chars().count() <= MAX {
        one_line
    } else {
        let mut s: String = one_line.chars().take(MAX).collect();
        s.push('…');
        s
    }
}

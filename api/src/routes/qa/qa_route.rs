//! POST /qa — answers a question about one paper.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::qa::qa_request::{QaRequest, QaResponse},
};

/// Handler: POST /qa
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/qa \
///   -H 'content-type: application/json' \
///   -d '{"paperUrl":"https://arxiv.org/pdf/2305.15334.pdf","question":"What is the main contribution?"}'
/// ```
pub async fn qa(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QaRequest>, JsonRejection>,
) -> AppResult<Json<QaResponse>> {
    let Json(body) = payload.inspect_err(|e| warn!(error = %e, "rejected /qa body"))?;
    let started = Instant::now();

    let batch = state
        .qa
        .qa_on_paper(&body.question, &body.paper_url)
        .await
        .inspect_err(|e| warn!(paper = %body.paper_url, error = %e, "/qa failed"))?;

    info!(
        paper = %body.paper_url,
        found = batch.is_some(),
        latency_ms = started.elapsed().as_millis(),
        "/qa served"
    );
    Ok(Json(batch.map(|b| b.groups())))
}

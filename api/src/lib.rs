use std::{env, error::Error, sync::Arc};

mod core;
mod error_handler;
mod routes;

pub use crate::core::app_state::AppState;
pub use crate::error_handler::{AppError, AppResult};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::routes::{health::health_route::health, qa::qa_route::qa};

/// Builds the HTTP router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/qa", post(qa))
        .with_state(state)
}

/// Bind address: `API_ADDRESS`, else `0.0.0.0:${PORT:-8000}`.
fn bind_address() -> String {
    env::var("API_ADDRESS")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            let port = env::var("PORT").unwrap_or_else(|_| "8000".into());
            format!("0.0.0.0:{}", port.trim())
        })
}

pub async fn start() -> Result<(), Box<dyn Error>> {
    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    let host_url = bind_address();
    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("API stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

use std::error::Error;

use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file; a missing file is fine.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    // RUST_LOG wins; otherwise `info` for the workspace crates.
    ai_llm_service::telemetry::init("info")?;
    info!(version = env!("CARGO_PKG_VERSION"), "paper-qa-backend starting");

    if let Err(e) = api::start().await {
        error!(error = %e, "server terminated with error");
        return Err(e);
    }

    Ok(())
}

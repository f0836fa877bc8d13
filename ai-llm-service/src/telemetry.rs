//! Tracing setup shared by the backend binary and its libraries.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the workspace crates. Events from other crates
/// (hyper, reqwest, qdrant) are dropped by [`layer`].
pub const WORKSPACE_TARGETS: &[&str] = &[
    "ai_llm_service",
    "rag_store",
    "paper_store",
    "paper_qa",
    "api",
    "paper_qa_backend",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Returns `true` when an event target belongs to one of the workspace crates.
pub fn is_workspace_target(target: &str) -> bool {
    WORKSPACE_TARGETS.iter().any(|p| {
        target == *p || (target.starts_with(p) && target[p.len()..].starts_with("::"))
    })
}

/// Formatting layer that renders only events emitted by the workspace crates.
///
/// - RFC3339 UTC timestamps
/// - compact single-line format with `file:line`
/// - span close events (durations of `#[instrument]`ed calls)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();
    let only_workspace = filter::filter_fn(|meta| is_workspace_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_workspace)
}

/// `EnvFilter` from `RUST_LOG`, or `default` when unset/invalid.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber: env filter + workspace layer.
///
/// Returns an error if a global subscriber was already set.
pub fn init(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_targets_match_by_module_path() {
        assert!(is_workspace_target("paper_qa"));
        assert!(is_workspace_target("paper_qa::orchestrator"));
        assert!(!is_workspace_target("paper_qa_extra"));
        assert!(!is_workspace_target("hyper::proto"));
    }
}

//! Structured Logging
//!
//! - JSON output for log aggregation (`LOG_FORMAT=json`)
//! - Human-readable output otherwise
//!
//! ```rust,ignore
//! ug_common::logging::init_logging("ug-server");
//! tracing::info!(user_id = %id, "Session issued");
//! ```
//!
//! `RUST_LOG` controls filtering (default: `info`), e.g.
//! `RUST_LOG=ug_platform=debug,tower_http=info`.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    /// Anything other than `json` (case-insensitive) selects text.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Call once, at process start.
pub fn init_logging(service_name: &str) {
    let format = LogFormat::from_env();
    match format {
        LogFormat::Json => init_json_logging(default_filter()),
        LogFormat::Text => init_text_logging(default_filter()),
    }
    tracing::debug!(service = service_name, ?format, "Logging initialized");
}

fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .flatten_event(true)
                .with_span_events(FmtSpan::CLOSE),
        )
        .init();
}

fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(true),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
    }

    #[test]
    fn test_default_filter_builds() {
        let filter = default_filter();
        drop(filter);
    }
}

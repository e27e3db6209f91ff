//! Log output selection.

use std::env;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "vote_ledger=info,vote_ledger_repository=info,tower_http=info";

/// Output format chosen by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event, for log shippers.
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; unset means pretty.
    pub fn from_env() -> Self {
        env::var("LOG_FORMAT")
            .ok()
            .and_then(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// Parse a format name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "" => Some(Self::Pretty),
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Install the global subscriber for this format.
    pub fn init(self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let registry = tracing_subscriber::registry().with(filter);

        match self {
            LogFormat::Pretty => registry
                .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
                .init(),
            LogFormat::Compact => registry
                .with(tracing_subscriber::fmt::layer().with_target(false).compact())
                .init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .init(),
        }

        info!(
            service_name = "vote-ledger",
            service_version = env!("CARGO_PKG_VERSION"),
            log_format = ?self,
            "Logging initialized"
        );
    }
}

/// Install logging as configured by `LOG_FORMAT` and `RUST_LOG`.
pub fn init_logging() {
    LogFormat::from_env().init();

    // Reported after init so the warning reaches the subscriber.
    if let Some(raw) = env::var("LOG_FORMAT")
        .ok()
        .filter(|raw| LogFormat::parse(raw).is_none())
    {
        warn!(value = %raw, "Unknown LOG_FORMAT, using pretty output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_format() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" compact "), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse(""), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_default_filter_covers_both_crates() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(DEFAULT_LOG_FILTER.contains("vote_ledger_repository=info"));
    }
}

//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Directive used when the configured level does not parse.
const FALLBACK_DIRECTIVE: &str = "info";

/// Build the event filter.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used, and an
/// unparseable level falls back to `info`.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| directive_filter(&config.level))
}

fn directive_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVE))
}

/// Install the global tracing subscriber.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one keeps receiving events.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let json_layer = (config.format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (config.format == LogFormat::Text).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}

//! Telemetry and Observability
//!
//! Structured logging setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;

/// Initialize tracing subscriber
///
/// RUST_LOG takes precedence over the configured filter.
pub fn init_tracing(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let json_layer = settings
        .json
        .then(|| fmt::layer().json().with_target(true).with_current_span(false));

    let text_layer = (!settings.json).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!(json = settings.json, "Tracing initialized");
}

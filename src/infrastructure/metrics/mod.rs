//! Prometheus Metrics Module
//!
//! Counters and latency histograms for the state engine.
//!
//! # Metrics Collected
//! - Applied events by dispatch name
//! - State errors by dispatch name
//! - Store resets performed on ready
//! - Event apply latency histograms

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Events applied to the store, by dispatch name
pub static EVENTS_APPLIED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_applied_total", "Total number of gateway events applied").namespace("chat_state"),
        &["event"],
    )
    .expect("Failed to create EVENTS_APPLIED_TOTAL metric")
});

/// Non-fatal store failures, by the dispatch that caused them
pub static STATE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("state_errors_total", "Total number of state errors reported").namespace("chat_state"),
        &["event"],
    )
    .expect("Failed to create STATE_ERRORS_TOTAL metric")
});

/// Store wipes done before rebuilding from a ready payload
pub static STORE_RESETS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("store_resets_total", "Total number of store resets on ready").namespace("chat_state"),
    )
    .expect("Failed to create STORE_RESETS_TOTAL metric")
});

/// Time spent applying one event to the store
pub static EVENT_APPLY_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5];
    HistogramVec::new(
        HistogramOpts::new("event_apply_duration_seconds", "Event apply latency in seconds")
            .namespace("chat_state")
            .buckets(buckets),
        &["event"],
    )
    .expect("Failed to create EVENT_APPLY_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(EVENTS_APPLIED_TOTAL.clone()))
        .expect("Failed to register EVENTS_APPLIED_TOTAL");
    registry
        .register(Box::new(STATE_ERRORS_TOTAL.clone()))
        .expect("Failed to register STATE_ERRORS_TOTAL");
    registry
        .register(Box::new(STORE_RESETS_TOTAL.clone()))
        .expect("Failed to register STORE_RESETS_TOTAL");
    registry
        .register(Box::new(EVENT_APPLY_DURATION_SECONDS.clone()))
        .expect("Failed to register EVENT_APPLY_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Metrics should be valid UTF-8")
}

/// Helper to record one applied event
pub fn record_event(event: &str, errors: usize, duration_secs: f64) {
    // make sure the statics are registered before the first sample
    Lazy::force(&REGISTRY);

    EVENTS_APPLIED_TOTAL.with_label_values(&[event]).inc();
    if errors > 0 {
        STATE_ERRORS_TOTAL
            .with_label_values(&[event])
            .inc_by(errors as u64);
    }
    EVENT_APPLY_DURATION_SECONDS
        .with_label_values(&[event])
        .observe(duration_secs);
}

pub fn record_store_reset() {
    Lazy::force(&REGISTRY);
    STORE_RESETS_TOTAL.inc();
}

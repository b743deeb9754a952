// Prometheus metrics definitions for the draft assistant backend.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // ── Counters ─────────────────────────────────────────────────────

    /// Oracle calls by flow (analyze, validate_lane) and outcome (ok or error kind).
    pub static ref ORACLE_CALLS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("draft_oracle_calls_total", "Oracle calls by flow and outcome"),
        &["flow", "outcome"],
    )
    .unwrap();

    /// Reconciled picks by how they were obtained (accepted, auto_assigned, backfilled).
    pub static ref RECONCILED_PICKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("draft_reconciled_picks_total", "Reconciled picks by source"),
        &["source"],
    )
    .unwrap();

    /// Oracle proposal entries the reconciler threw away.
    pub static ref RECONCILE_DROPPED_TOTAL: IntCounter = IntCounter::new(
        "draft_reconcile_dropped_total",
        "Oracle proposal entries dropped by the reconciler",
    )
    .unwrap();

    /// Responses served from the static fallback dataset.
    pub static ref FALLBACK_SERVED_TOTAL: IntCounter = IntCounter::new(
        "draft_fallback_served_total",
        "Analyze responses served from the fallback dataset",
    )
    .unwrap();

    /// Total API requests, by method/endpoint/status.
    pub static ref API_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("draft_api_requests_total", "Total API requests"),
        &["method", "endpoint", "status"],
    )
    .unwrap();

    // ── Histograms ───────────────────────────────────────────────────

    /// Oracle round-trip time in seconds.
    pub static ref ORACLE_CALL_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("draft_oracle_call_duration_seconds", "Oracle round-trip time in seconds")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0]),
    )
    .unwrap();

    /// API request duration in seconds, by endpoint.
    pub static ref API_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "draft_api_request_duration_seconds",
            "API request duration in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 5.0, 10.0]),
        &["endpoint"],
    )
    .unwrap();
}

/// Register all metrics with the custom registry. Call once at startup.
/// Registering twice is harmless: duplicates are ignored.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ORACLE_CALLS_TOTAL.clone()),
        Box::new(RECONCILED_PICKS_TOTAL.clone()),
        Box::new(RECONCILE_DROPPED_TOTAL.clone()),
        Box::new(FALLBACK_SERVED_TOTAL.clone()),
        Box::new(API_REQUESTS_TOTAL.clone()),
        Box::new(ORACLE_CALL_DURATION_SECONDS.clone()),
        Box::new(API_REQUEST_DURATION_SECONDS.clone()),
    ];

    for c in collectors {
        match REGISTRY.register(c) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => tracing::warn!("Failed to register metric: {e}"),
        }
    }
}

/// Serialize all registered metrics to the Prometheus text exposition format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {e}");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Normalize a URL path for metric labels: collapse the hero segment of
/// `/api/heroes/{hero}/lanes` to `:hero` and every static frontend file to
/// `/static`, and any other `/api` path to `/api/unknown`, to prevent
/// cardinality explosion.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        ["", "api", "heroes", _, "lanes"] => "/api/heroes/:hero/lanes".to_string(),
        ["", "api", "analyze"]
        | ["", "api", "validate-lane"]
        | ["", "api", "heroes"]
        | ["", "api", "lanes"]
        | ["", "health"]
        | ["", "metrics"]
        | ["", "llms.txt"] => path.to_string(),
        ["", "api", ..] => "/api/unknown".to_string(),
        _ => "/static".to_string(),
    }
}

/// Metrics and telemetry for the govdir API
///
/// Prometheus-compatible counters for:
/// - Request outcomes
/// - Cache hit/miss rates
/// - Directory store query volume and failures
use lazy_static::lazy_static;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

lazy_static! {
    /// Total resolution requests by outcome ("ok", "rejected", "error")
    pub static ref REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "govdir_requests_total",
        "Total number of resolution requests",
        &["outcome"]
    )
    .unwrap();

    /// Handle cache hits
    pub static ref CACHE_HITS_TOTAL: IntCounter = register_int_counter!(
        "govdir_cache_hits_total",
        "Number of handle cache hits"
    )
    .unwrap();

    /// Handle cache misses
    pub static ref CACHE_MISSES_TOTAL: IntCounter = register_int_counter!(
        "govdir_cache_misses_total",
        "Number of handle cache misses"
    )
    .unwrap();

    /// Directory store queries issued
    pub static ref STORE_QUERIES_TOTAL: IntCounter = register_int_counter!(
        "govdir_store_queries_total",
        "Number of directory store queries"
    )
    .unwrap();

    /// Directory store query failures
    pub static ref STORE_QUERY_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "govdir_store_query_failures_total",
        "Number of failed directory store queries"
    )
    .unwrap();

    /// Cache entries evicted by the background sweep
    pub static ref CACHE_SWEEP_EVICTIONS_TOTAL: IntCounter = register_int_counter!(
        "govdir_cache_sweep_evictions_total",
        "Number of expired cache entries removed by the sweep job"
    )
    .unwrap();
}

/// Render all registered metrics in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

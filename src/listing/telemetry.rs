use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct Metrics {
    pub lists_total: AtomicU64,
    pub aggregate_lists_total: AtomicU64,
    pub scans_total: AtomicU64,
    pub scan_failures_total: AtomicU64,
    pub invalid_cursors_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub lists_total: u64,
    pub aggregate_lists_total: u64,
    pub scans_total: u64,
    pub scan_failures_total: u64,
    pub invalid_cursors_total: u64,
}

static METRICS: LazyLock<Metrics> = LazyLock::new(Metrics::default);

pub(crate) fn record_scan() {
    METRICS.scans_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_scan_failure() {
    METRICS.scan_failures_total.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_invalid_cursor() {
    METRICS.invalid_cursors_total.fetch_add(1, Ordering::Relaxed);
}

fn sha256_hex(input: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut h = Sha256::new();
    h.update(input.as_bytes());
    hex::encode(h.finalize())
}

/// Counts one finished listing call and writes a structured line to the
/// `scanpage::metrics` target. Filter values are hashed, never logged.
pub(crate) fn log_list(
    table: &str,
    filter_dbg: &str,
    duration_ms: u128,
    aggregate: bool,
    scan_calls: usize,
    result_count: usize,
) {
    METRICS.lists_total.fetch_add(1, Ordering::Relaxed);
    if aggregate {
        METRICS.aggregate_lists_total.fetch_add(1, Ordering::Relaxed);
    }
    let line = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "table": table,
        "filter_hash": sha256_hex(filter_dbg),
        "duration_ms": crate::utils::num::u128_to_u64_saturating(duration_ms),
        "aggregate": aggregate,
        "scan_calls": scan_calls,
        "result_count": result_count,
    });
    log::info!(target: crate::logger::METRICS_TARGET, "{line}");
}

#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    let m = &*METRICS;
    MetricsSnapshot {
        lists_total: m.lists_total.load(Ordering::Relaxed),
        aggregate_lists_total: m.aggregate_lists_total.load(Ordering::Relaxed),
        scans_total: m.scans_total.load(Ordering::Relaxed),
        scan_failures_total: m.scan_failures_total.load(Ordering::Relaxed),
        invalid_cursors_total: m.invalid_cursors_total.load(Ordering::Relaxed),
    }
}

#[must_use]
pub fn metrics_text() -> String {
    // OpenMetrics/Prometheus exposition format (no types/HELP for brevity)
    let s = snapshot();
    format!(
        "scanpage_lists_total {}\n\
         scanpage_aggregate_lists_total {}\n\
         scanpage_scans_total {}\n\
         scanpage_scan_failures_total {}\n\
         scanpage_invalid_cursors_total {}\n",
        s.lists_total,
        s.aggregate_lists_total,
        s.scans_total,
        s.scan_failures_total,
        s.invalid_cursors_total,
    )
}

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::trends::AggregationSummary;

pub const REQUESTS_TOTAL: &str = "tag_trends_requests_total";
pub const ROWS_DROPPED_TOTAL: &str = "tag_trends_rows_dropped_total";
pub const ERRORS_TOTAL: &str = "tag_trends_errors_total";
pub const COMPUTE_MS: &str = "tag_trends_compute_ms";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder. Only one recorder may exist per process.
    pub fn install() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(REQUESTS_TOTAL, "Requests served, by route.");
        describe_counter!(
            ROWS_DROPPED_TOTAL,
            "Dataset rows skipped by the aggregation, by reason."
        );
        describe_counter!(ERRORS_TOTAL, "Failed /data requests, by kind.");
        describe_histogram!(COMPUTE_MS, "Dataset load + aggregation time in milliseconds.");
    });
}

pub(crate) fn record_request(route: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "route" => route).increment(1);
}

pub(crate) fn record_error(kind: &'static str) {
    metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
}

pub(crate) fn record_run(summary: &AggregationSummary, elapsed_ms: f64) {
    metrics::counter!(ROWS_DROPPED_TOTAL, "reason" => "bad_time")
        .increment(summary.dropped_bad_time as u64);
    metrics::counter!(ROWS_DROPPED_TOTAL, "reason" => "missing_tag")
        .increment(summary.dropped_missing_tag as u64);
    metrics::histogram!(COMPUTE_MS).record(elapsed_ms);
}

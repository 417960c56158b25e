//! Metric recording and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): all requests by method/route/status
//! - `http_request_duration_seconds` (histogram): latency by method/route/status
//! - `blocked_requests_total` (counter): gate rejections by route
//! - `auth_failures_total` (counter): failed login attempts
//! - `denylist_size` (gauge): live address blocks

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram,
};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

/// Histogram buckets for request durations, in seconds.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Recording surface handed to the gate, the sweeper and the application
/// handlers. Injectable so tests can substitute a recording sink;
/// production wires [`PrometheusMetrics`].
pub trait MetricsSink: Send + Sync {
    fn record_request(&self, method: &str, route: &str, status: u16);
    fn observe_duration(&self, method: &str, route: &str, status: u16, seconds: f64);
    fn record_blocked(&self, route: &str);
    fn record_auth_failure(&self);
    fn set_denylist_size(&self, size: usize);
}

/// Sink backed by the process-global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusMetrics;

impl MetricsSink for PrometheusMetrics {
    fn record_request(&self, method: &str, route: &str, status: u16) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "route" => route.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
    }

    fn observe_duration(&self, method: &str, route: &str, status: u16, seconds: f64) {
        histogram!(
            "http_request_duration_seconds",
            "method" => method.to_string(),
            "route" => route.to_string(),
            "status" => status.to_string()
        )
        .record(seconds);
    }

    fn record_blocked(&self, route: &str) {
        counter!("blocked_requests_total", "route" => route.to_string()).increment(1);
    }

    fn record_auth_failure(&self) {
        counter!("auth_failures_total").increment(1);
    }

    fn set_denylist_size(&self, size: usize) {
        gauge!("denylist_size").set(size as f64);
    }
}

/// Install the Prometheus recorder and describe every metric family.
///
/// Must run once per process, before the first metric is recorded;
/// [`PrometheusHandle::render`] serves the exposition text.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()?;

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "Duration of HTTP requests in seconds"
    );
    describe_counter!(
        "blocked_requests_total",
        "Total number of requests blocked by denylist"
    );
    describe_counter!("auth_failures_total", "Total number of failed login attempts");
    describe_gauge!("denylist_size", "Number of currently active IP blocks in the denylist");

    Ok(handle)
}

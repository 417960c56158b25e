//! Observability subsystem.
//!
//! Tracing subscriber setup lives in the binary; this module owns metric
//! recording and the Prometheus exposition handle.

pub mod metrics;

pub use metrics::{install_recorder, MetricsSink, PrometheusMetrics};

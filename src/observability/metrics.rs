//! Metrics collection and exposition.
//!
//! # Metrics
//! - `shim_invocations_total` (counter): invocations by outcome
//! - `shim_upstream_duration_seconds` (histogram): origin exchange latency by status
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;
use reqwest::StatusCode;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Forwarded,
    BadRequest,
    BadGateway,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Forwarded => "forwarded",
            Outcome::BadRequest => "bad_request",
            Outcome::BadGateway => "bad_gateway",
        }
    }
}

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_invocation(outcome: Outcome) {
    ::metrics::counter!("shim_invocations_total", "outcome" => outcome.as_str()).increment(1);
}

/// `status` is `None` when the exchange failed before a response arrived.
pub fn record_upstream(status: Option<StatusCode>, started: Instant) {
    let status = status
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "error".to_string());
    ::metrics::histogram!("shim_upstream_duration_seconds", "status" => status)
        .record(started.elapsed().as_secs_f64());
}

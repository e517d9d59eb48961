//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by lane and status
//! - `gateway_request_duration_seconds` (histogram): latency by lane
//!
//! # Design Decisions
//! - Prometheus-compatible endpoint on its own listener
//! - Lane labels match `RoutingDecision::lane`, plus "excluded" for paths
//!   outside the dispatcher's jurisdiction

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatched request.
pub fn record_dispatch(lane: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "lane" => lane,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "lane" => lane)
        .record(start.elapsed().as_secs_f64());
}

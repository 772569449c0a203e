//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mvc_requests_total` (counter): requests by outcome (view, redirect,
//!   error, not_served)
//! - `mvc_dispatch_errors_total` (counter): failed dispatches by error kind
//! - `mvc_route_table_build_seconds` (histogram): directory scan latency
//! - `mvc_route_table_controllers` (gauge): controllers in the last build
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is opt-in

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(outcome: &'static str) {
    counter!("mvc_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_dispatch_error(kind: &'static str) {
    counter!("mvc_dispatch_errors_total", "kind" => kind).increment(1);
}

pub fn record_route_table_build(started: Instant, controllers: usize) {
    histogram!("mvc_route_table_build_seconds").record(started.elapsed().as_secs_f64());
    gauge!("mvc_route_table_controllers").set(controllers as f64);
}

//! Metrics collection and exposition.
//!
//! # Metrics
//! - `statistics_reload_cycles_total` (counter): reload cycles by outcome
//! - `statistics_reload_duration_seconds` (histogram): time spent per cycle
//! - `statistics_servers_loaded` (gauge): servers present in the last load
//! - `statistics_server_score` (gauge): success ratio per roster server
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing unless `init_metrics` was called.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_reload_cycle(outcome: &'static str, start: Instant) {
    metrics::counter!("statistics_reload_cycles_total", "outcome" => outcome).increment(1);
    metrics::histogram!("statistics_reload_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_servers_loaded(count: usize) {
    metrics::gauge!("statistics_servers_loaded").set(count as f64);
}

pub fn record_server_score(server: &str, score: f64) {
    metrics::gauge!("statistics_server_score", "server" => server.to_string()).set(score);
}

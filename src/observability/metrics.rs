//! Metrics collection and exposition.
//!
//! # Metrics
//! - `throttle_requests_total` (counter): requests by `outcome`
//!   (`forwarded`, `limited`, `canceled`)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// What the limit middleware did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Forwarded,
    Limited,
    Canceled,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Forwarded => "forwarded",
            Outcome::Limited => "limited",
            Outcome::Canceled => "canceled",
        }
    }
}

pub fn record_outcome(outcome: Outcome) {
    ::metrics::counter!("throttle_requests_total", "outcome" => outcome.as_str()).increment(1);
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

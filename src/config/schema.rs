//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::limiter::keys::{default_ip_lookups, IpLookup};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Listener configuration for the bundled server.
    pub listener: ListenerConfig,

    /// Rate limiting policy.
    pub limiter: LimiterSettings,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rate limiting policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimiterSettings {
    /// Requests allowed per key within `period_ms`.
    pub max_requests: u32,

    /// Length of the accounting window in milliseconds.
    pub period_ms: u64,

    /// Body sent when a request is rejected.
    pub message: String,

    /// Content type of the rejection body.
    pub message_content_type: String,

    /// Status code of the rejection response.
    pub status_code: u16,

    /// Client address sources, tried in order.
    pub ip_lookups: Vec<IpLookup>,

    /// Only limit these methods. Empty means every method.
    pub methods: Vec<String>,

    /// Header values appended to the accounting key.
    pub headers: Vec<String>,

    /// How often idle keys are pruned, in seconds.
    pub cleanup_interval_secs: u64,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            max_requests: 1,
            period_ms: 1000,
            message: "You have reached maximum request limit.".to_string(),
            message_content_type: "text/plain; charset=utf-8".to_string(),
            status_code: 429,
            ip_lookups: default_ip_lookups(),
            methods: Vec::new(),
            headers: Vec::new(),
            cleanup_interval_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Prometheus scrape address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "request_throttle=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware and server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request outcome counters)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;

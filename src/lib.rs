//! Request throttling middleware for tower/axum services.
//!
//! Wraps a downstream service so every request is checked for cancellation
//! and against a rate limiter before it is forwarded.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod limiter;
pub mod observability;

pub use config::schema::ThrottleConfig;
pub use http::middleware::limit::{limit_handler, LimitLayer, LimitService};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use limiter::{KeyedLimiter, LimitError, RequestLimiter};

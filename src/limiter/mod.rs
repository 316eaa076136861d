//! Rate limiter collaborator.
//!
//! # Data Flow
//! ```text
//! Request
//!     → keys.rs (remote IP lookup, path, method/header filters)
//!     → keyed.rs (governor keyed quota, one cell per request)
//!     → Option<LimitError>
//! ```
//!
//! # Design Decisions
//! - The check is synchronous; accounting side effects stay in the limiter
//! - The message content type is parsed once, at construction
//! - Keyed state lives in governor's concurrent store, no extra locking here

pub mod keyed;
pub mod keys;

use axum::http::{HeaderValue, Request, StatusCode};

pub use keyed::{BuildError, KeyedLimiter};
pub use keys::{IpLookup, KeyBuilder};

/// A limiting decision: the response status and body to reject with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct LimitError {
    pub status: StatusCode,
    pub message: String,
}

impl LimitError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// The check a limiting middleware delegates to.
///
/// Implementations must be safe to call from many in-flight requests at
/// once; the middleware adds no synchronization of its own.
pub trait RequestLimiter: Send + Sync + 'static {
    /// Content type sent with rejection bodies.
    fn message_content_type(&self) -> &HeaderValue;

    /// Account for `request`, returning a decision if it must be rejected.
    fn check<B>(&self, request: &Request<B>) -> Option<LimitError>;
}

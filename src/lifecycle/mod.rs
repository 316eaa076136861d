//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     root CancellationToken → stop accepting, drain connections
//!
//! Cancellation (cancel.rs):
//!     child token per request → polled by the limit middleware
//! ```
//!
//! # Design Decisions
//! - One root token; every request gets a child so a trigger reaches all of them
//! - Requests still in the chain after a trigger are answered with 503

pub mod cancel;
pub mod shutdown;
pub mod signals;

pub use cancel::{CancelOnShutdown, CancelOnShutdownLayer};
pub use shutdown::Shutdown;

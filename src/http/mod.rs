//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ConnectInfo)
//!     → TraceLayer
//!     → CancelOnShutdownLayer (attach cancellation token)
//!     → middleware/limit.rs (cancel check, rate limit check)
//!     → handler
//! ```

pub mod middleware;
pub mod server;

pub use server::HttpServer;

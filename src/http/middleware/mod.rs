//! Request middleware.

pub mod limit;

pub use limit::{limit_handler, LimitLayer, LimitService, CANCELED_MESSAGE};

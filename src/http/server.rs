//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the limiter from configuration
//! - Create the Axum router and wire up middleware (trace, cancellation, limit)
//! - Serve until shutdown is triggered
//! - Periodically prune idle limiter keys

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ThrottleConfig;
use crate::http::middleware::LimitLayer;
use crate::lifecycle::{CancelOnShutdownLayer, Shutdown};
use crate::limiter::{BuildError, KeyedLimiter};

/// Demo HTTP server with the throttling chain in front of a single handler.
pub struct HttpServer {
    router: Router,
    config: ThrottleConfig,
    limiter: Arc<KeyedLimiter>,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ThrottleConfig, shutdown: Shutdown) -> Result<Self, BuildError> {
        let limiter = Arc::new(KeyedLimiter::new(&config.limiter)?);
        let router = Self::build_router(limiter.clone(), &shutdown);
        Ok(Self {
            router,
            config,
            limiter,
            shutdown,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(limiter: Arc<KeyedLimiter>, shutdown: &Shutdown) -> Router {
        Router::new()
            .route("/", any(ok_handler))
            .route("/{*path}", any(ok_handler))
            .layer(LimitLayer::new(limiter))
            .layer(CancelOnShutdownLayer::new(shutdown.token()))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            max_requests = self.config.limiter.max_requests,
            period_ms = self.config.limiter.period_ms,
            "HTTP server starting"
        );

        let interval = Duration::from_secs(self.config.limiter.cleanup_interval_secs.max(1));
        tokio::spawn(prune_idle_keys(self.limiter.clone(), interval, self.shutdown.clone()));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let shutdown = self.shutdown.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ThrottleConfig {
        &self.config
    }
}

async fn ok_handler() -> &'static str {
    "OK"
}

async fn prune_idle_keys(limiter: Arc<KeyedLimiter>, every: Duration, shutdown: Shutdown) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                limiter.retain_recent();
                tracing::trace!(keys = limiter.tracked_keys(), "Pruned idle limiter keys");
            }
            _ = shutdown.wait() => break,
        }
    }
}

//! request-throttle demo server.
//!
//! Serves a trivial handler behind the throttling middleware chain.
//!
//! ```text
//! Client Request
//!     → TraceLayer
//!     → CancelOnShutdownLayer
//!     → LimitLayer (503 if canceled, limiter status if limited)
//!     → handler
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use request_throttle::config::{load_config, ThrottleConfig};
use request_throttle::lifecycle::signals::trigger_on_ctrl_c;
use request_throttle::observability::{logging, metrics};
use request_throttle::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "request-throttle")]
#[command(about = "Rate limited HTTP server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ThrottleConfig::default(),
    };

    logging::init_logging(&config.observability.log_filter);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_requests = config.limiter.max_requests,
        period_ms = config.limiter.period_ms,
        status_code = config.limiter.status_code,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    tokio::spawn(trigger_on_ctrl_c(shutdown.clone()));

    let server = HttpServer::new(config, shutdown)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

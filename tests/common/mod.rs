//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use request_throttle::config::ThrottleConfig;
use request_throttle::{HttpServer, Shutdown};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the throttled server with `config` on 127.0.0.1:0.
pub async fn start_server(config: ThrottleConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, shutdown.clone()).unwrap();
    let handle = tokio::spawn(async move { server.run(listener).await });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never reuses connections or consults system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

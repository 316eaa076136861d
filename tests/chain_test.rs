//! Middleware chain tests against the governor-backed limiter.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use request_throttle::config::LimiterSettings;
use request_throttle::http::middleware::CANCELED_MESSAGE;
use request_throttle::lifecycle::{CancelOnShutdownLayer, Shutdown};
use request_throttle::{KeyedLimiter, LimitLayer};
use tokio::task::JoinSet;
use tower::{service_fn, Layer, ServiceBuilder, ServiceExt};

fn request_from(ip: &str) -> Request<Body> {
    Request::builder()
        .uri("/orders")
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

fn limiter(max_requests: u32, period_ms: u64) -> Arc<KeyedLimiter> {
    let settings = LimiterSettings {
        max_requests,
        period_ms,
        ..LimiterSettings::default()
    };
    Arc::new(KeyedLimiter::new(&settings).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_respect_quota() {
    const TOTAL: usize = 50;
    const QUOTA: u32 = 5;

    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let inner = service_fn(move |_req: Request<Body>| {
        counted.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, Infallible>(Response::new(Body::from("ok"))) }
    });
    let svc = LimitLayer::new(limiter(QUOTA, 60_000)).layer(inner);

    let mut set = JoinSet::new();
    for _ in 0..TOTAL {
        let svc = svc.clone();
        set.spawn(async move { svc.oneshot(request_from("10.9.9.9")).await.unwrap().status() });
    }

    let mut forwarded = 0;
    let mut limited = 0;
    while let Some(status) = set.join_next().await {
        match status.unwrap() {
            StatusCode::OK => forwarded += 1,
            StatusCode::TOO_MANY_REQUESTS => limited += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(forwarded, QUOTA as usize);
    assert_eq!(limited, TOTAL - QUOTA as usize);
    assert_eq!(calls.load(Ordering::SeqCst), QUOTA as usize);
}

#[tokio::test]
async fn test_shutdown_cancels_requests_in_chain() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let inner = service_fn(move |_req: Request<Body>| {
        counted.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, Infallible>(Response::new(Body::from("ok"))) }
    });

    let shutdown = Shutdown::new();
    let svc = ServiceBuilder::new()
        .layer(CancelOnShutdownLayer::new(shutdown.token()))
        .layer(LimitLayer::new(limiter(100, 1000)))
        .service(inner);

    let before = svc.clone().oneshot(request_from("10.0.0.1")).await.unwrap();
    assert_eq!(before.status(), StatusCode::OK);

    shutdown.trigger();
    let after = svc.oneshot(request_from("10.0.0.1")).await.unwrap();
    assert_eq!(after.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(after.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], CANCELED_MESSAGE.as_bytes());

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

//! Per-request cancellation signal.

use std::task::{Context, Poll};

use axum::http::Request;
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};

/// Attaches a child of a shutdown token to every request.
///
/// Requests that already carry a `CancellationToken` extension keep it.
#[derive(Debug, Clone)]
pub struct CancelOnShutdownLayer {
    token: CancellationToken,
}

impl CancelOnShutdownLayer {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl<S> Layer<S> for CancelOnShutdownLayer {
    type Service = CancelOnShutdown<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CancelOnShutdown {
            inner,
            token: self.token.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CancelOnShutdown<S> {
    inner: S,
    token: CancellationToken,
}

impl<S, B> Service<Request<B>> for CancelOnShutdown<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if req.extensions().get::<CancellationToken>().is_none() {
            req.extensions_mut().insert(self.token.child_token());
        }
        self.inner.call(req)
    }
}

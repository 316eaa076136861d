//! Rate limiting middleware.
//!
//! Every request is handled in one of three ways:
//! - its cancellation token has already fired: `503 Service Unavailable`
//! - the limiter returns a decision: that status and message
//! - otherwise: forwarded to the wrapped service, untouched
//!
//! The limiter is consulted synchronously inside `call`, so nothing is
//! awaited before the decision and the wrapped service is only invoked on
//! the forward path.

use std::future::{ready, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::{header, HeaderValue, Request, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};

use crate::limiter::{LimitError, RequestLimiter};
use crate::observability::metrics::{self, Outcome};

/// Body of the response sent for a cancelled request.
pub const CANCELED_MESSAGE: &str = "Context was canceled";

/// Build a layer that throttles requests through `limiter`.
pub fn limit_handler<L: RequestLimiter>(limiter: Arc<L>) -> LimitLayer<L> {
    LimitLayer::new(limiter)
}

/// Layer producing [`LimitService`].
pub struct LimitLayer<L> {
    limiter: Arc<L>,
}

impl<L> LimitLayer<L> {
    pub fn new(limiter: Arc<L>) -> Self {
        Self { limiter }
    }

    pub fn limiter(&self) -> &Arc<L> {
        &self.limiter
    }
}

impl<L> Clone for LimitLayer<L> {
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
        }
    }
}

impl<S, L> Layer<S> for LimitLayer<L> {
    type Service = LimitService<S, L>;

    fn layer(&self, inner: S) -> Self::Service {
        LimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Service that rejects cancelled or limited requests and forwards the rest.
pub struct LimitService<S, L> {
    inner: S,
    limiter: Arc<L>,
}

impl<S: Clone, L> Clone for LimitService<S, L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

impl<S, L, B, ResBody> Service<Request<B>> for LimitService<S, L>
where
    S: Service<Request<B>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    L: RequestLimiter,
    ResBody: From<String> + Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = BoxFuture<Response<ResBody>, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if is_canceled(&req) {
            tracing::debug!(path = %req.uri().path(), "Request canceled before rate limit check");
            metrics::record_outcome(Outcome::Canceled);
            return Box::pin(ready(Ok(canceled_response())));
        }

        if let Some(err) = self.limiter.check(&req) {
            tracing::warn!(
                path = %req.uri().path(),
                status = %err.status,
                "Rate limit exceeded"
            );
            metrics::record_outcome(Outcome::Limited);
            let response = limited_response(err, self.limiter.message_content_type());
            return Box::pin(ready(Ok(response)));
        }

        metrics::record_outcome(Outcome::Forwarded);

        // `self.inner` is the instance that was polled ready; leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        Box::pin(inner.call(req))
    }
}

fn is_canceled<B>(req: &Request<B>) -> bool {
    req.extensions()
        .get::<CancellationToken>()
        .is_some_and(CancellationToken::is_cancelled)
}

fn canceled_response<T: From<String>>() -> Response<T> {
    let mut response = Response::new(T::from(CANCELED_MESSAGE.to_string()));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    response
}

fn limited_response<T: From<String>>(err: LimitError, content_type: &HeaderValue) -> Response<T> {
    let mut response = Response::new(T::from(err.message));
    *response.status_mut() = err.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type.clone());
    response
}

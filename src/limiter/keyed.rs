//! Governor-backed keyed limiter.

use std::num::NonZeroU32;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use crate::config::schema::LimiterSettings;
use crate::limiter::keys::KeyBuilder;
use crate::limiter::{LimitError, RequestLimiter};

/// Error building a limiter from settings.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("max_requests must be greater than zero")]
    ZeroRequests,
    #[error("period of {0}ms is too short for the configured request count")]
    PeriodTooShort(u64),
    #[error("invalid status code: {0}")]
    InvalidStatus(u16),
    #[error("invalid message content type: {0:?}")]
    InvalidContentType(String),
    #[error("invalid method: {0:?}")]
    InvalidMethod(String),
    #[error("invalid header name: {0:?}")]
    InvalidHeader(String),
}

/// Per-key limiter: `max_requests` per `period_ms`, burst of `max_requests`.
pub struct KeyedLimiter {
    state: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
    clock: DefaultClock,
    keys: KeyBuilder,
    status: StatusCode,
    message: String,
    content_type: HeaderValue,
}

impl KeyedLimiter {
    pub fn new(settings: &LimiterSettings) -> Result<Self, BuildError> {
        let max = NonZeroU32::new(settings.max_requests).ok_or(BuildError::ZeroRequests)?;
        let replenish = Duration::from_millis(settings.period_ms) / max.get();
        let quota = Quota::with_period(replenish)
            .ok_or(BuildError::PeriodTooShort(settings.period_ms))?
            .allow_burst(max);

        let status = StatusCode::from_u16(settings.status_code)
            .map_err(|_| BuildError::InvalidStatus(settings.status_code))?;
        let content_type = HeaderValue::from_str(&settings.message_content_type)
            .map_err(|_| BuildError::InvalidContentType(settings.message_content_type.clone()))?;

        let methods = settings
            .methods
            .iter()
            .map(|m| Method::from_bytes(m.as_bytes()).map_err(|_| BuildError::InvalidMethod(m.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        let headers = settings
            .headers
            .iter()
            .map(|h| HeaderName::from_bytes(h.as_bytes()).map_err(|_| BuildError::InvalidHeader(h.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            state: RateLimiter::keyed(quota),
            clock: DefaultClock::default(),
            keys: KeyBuilder::new(settings.ip_lookups.clone(), methods, headers),
            status,
            message: settings.message.clone(),
            content_type,
        })
    }

    /// Drop keys whose quota has fully replenished.
    pub fn retain_recent(&self) {
        self.state.retain_recent();
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.len()
    }
}

impl RequestLimiter for KeyedLimiter {
    fn message_content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    fn check<B>(&self, request: &Request<B>) -> Option<LimitError> {
        let key = self.keys.build(request)?;

        match self.state.check_key(&key) {
            Ok(()) => None,
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.clock.now());
                tracing::debug!(key = %key, wait_ms = wait.as_millis() as u64, "Quota exhausted");
                Some(LimitError::new(self.status, self.message.clone()))
            }
        }
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (quota > 0, status code in range)
//! - Check that strings destined for HTTP headers are valid
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ThrottleConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};

use crate::config::schema::ThrottleConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("limiter.max_requests must be greater than zero")]
    ZeroMaxRequests,
    #[error("limiter.period_ms must be greater than zero")]
    ZeroPeriod,
    #[error("limiter.status_code {0} is not a valid HTTP status")]
    InvalidStatusCode(u16),
    #[error("limiter.message_content_type {0:?} is not a valid header value")]
    InvalidContentType(String),
    #[error("limiter.methods entry {0:?} is not a valid method")]
    InvalidMethod(String),
    #[error("limiter.headers entry {0:?} is not a valid header name")]
    InvalidHeaderName(String),
    #[error("{field} {value:?} is not a socket address")]
    InvalidAddress { field: &'static str, value: String },
}

pub fn validate_config(config: &ThrottleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let limiter = &config.limiter;

    if limiter.max_requests == 0 {
        errors.push(ValidationError::ZeroMaxRequests);
    }
    if limiter.period_ms == 0 {
        errors.push(ValidationError::ZeroPeriod);
    }
    if StatusCode::from_u16(limiter.status_code).is_err() {
        errors.push(ValidationError::InvalidStatusCode(limiter.status_code));
    }
    if limiter.message_content_type.is_empty()
        || HeaderValue::from_str(&limiter.message_content_type).is_err()
    {
        errors.push(ValidationError::InvalidContentType(
            limiter.message_content_type.clone(),
        ));
    }
    for method in &limiter.methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }
    for header in &limiter.headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(header.clone()));
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ThrottleConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ThrottleConfig::default();
        config.limiter.max_requests = 0;
        config.limiter.period_ms = 0;
        config.limiter.message_content_type = String::new();
        config.limiter.methods = vec!["GET".into(), "BAD METHOD".into()];
        config.limiter.headers = vec!["x-ok".into(), "not ok".into()];
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::ZeroMaxRequests,
                ValidationError::ZeroPeriod,
                ValidationError::InvalidContentType(String::new()),
                ValidationError::InvalidMethod("BAD METHOD".into()),
                ValidationError::InvalidHeaderName("not ok".into()),
                ValidationError::InvalidAddress {
                    field: "listener.bind_address",
                    value: "localhost".into(),
                },
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ThrottleConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(validate_config(&config).unwrap_err().len(), 1);
    }
}

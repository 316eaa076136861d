//! Limiter key extraction.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::{HeaderName, Method, Request};
use serde::{Deserialize, Serialize};

/// Where to look for the client address, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IpLookup {
    /// Peer address of the connection (`ConnectInfo<SocketAddr>`).
    RemoteAddr,
    /// First hop listed in `X-Forwarded-For`.
    #[serde(rename = "X-Forwarded-For")]
    ForwardedFor,
    #[serde(rename = "X-Real-IP")]
    RealIp,
}

pub fn default_ip_lookups() -> Vec<IpLookup> {
    vec![IpLookup::RemoteAddr, IpLookup::ForwardedFor, IpLookup::RealIp]
}

/// Resolve the client address using the first lookup that yields one.
pub fn remote_ip<B>(lookups: &[IpLookup], request: &Request<B>) -> Option<IpAddr> {
    lookups.iter().find_map(|lookup| match lookup {
        IpLookup::RemoteAddr => request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip()),
        IpLookup::ForwardedFor => header_ip(request, "x-forwarded-for"),
        IpLookup::RealIp => header_ip(request, "x-real-ip"),
    })
}

fn header_ip<B>(request: &Request<B>, name: &str) -> Option<IpAddr> {
    request
        .headers()
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Builds the accounting key for a request.
///
/// Key layout: `ip|path[|method][|header...]`. When a method filter is set,
/// requests with other methods get no key and are never limited.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    ip_lookups: Vec<IpLookup>,
    methods: Vec<Method>,
    headers: Vec<HeaderName>,
}

impl KeyBuilder {
    pub fn new(ip_lookups: Vec<IpLookup>, methods: Vec<Method>, headers: Vec<HeaderName>) -> Self {
        Self {
            ip_lookups,
            methods,
            headers,
        }
    }

    pub fn build<B>(&self, request: &Request<B>) -> Option<String> {
        if !self.methods.is_empty() && !self.methods.contains(request.method()) {
            return None;
        }

        let ip = remote_ip(&self.ip_lookups, request)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let mut key = format!("{}|{}", ip, request.uri().path());
        if !self.methods.is_empty() {
            key.push('|');
            key.push_str(request.method().as_str());
        }
        for name in &self.headers {
            key.push('|');
            if let Some(value) = request.headers().get(name).and_then(|v| v.to_str().ok()) {
                key.push_str(value);
            }
        }

        Some(key)
    }
}

impl Default for KeyBuilder {
    fn default() -> Self {
        Self::new(default_ip_lookups(), Vec::new(), Vec::new())
    }
}

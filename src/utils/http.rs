//! HTTP utility functions for extracting request information.

use crate::models::context::RequestCache;
use actix_web::{HttpMessage, HttpRequest};

/// Value reported when no client address can be determined
pub const UNKNOWN_IP: &str = "unknown";

/// Extract client IP address from request headers
///
/// The last entry of `X-Forwarded-For` wins, then the connection peer
/// address, then an address cached on the request by earlier middleware.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let forwarded_for = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok());

    let remote_addr = req.peer_addr().map(|addr| addr.ip().to_string());

    let cached = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_ip().map(str::to_string));

    resolve_client_ip(forwarded_for, remote_addr.as_deref(), cached.as_deref())
}

/// Header-preference chain behind [`extract_client_ip`]
pub fn resolve_client_ip(
    forwarded_for: Option<&str>,
    remote_addr: Option<&str>,
    cached: Option<&str>,
) -> String {
    if let Some(ip) = forwarded_for.and_then(last_forwarded_entry) {
        return ip.to_string();
    }

    remote_addr
        .filter(|ip| !ip.is_empty())
        .or(cached.filter(|ip| !ip.is_empty()))
        .unwrap_or(UNKNOWN_IP)
        .to_string()
}

/// Last non-empty entry of a comma-separated forwarded-for chain
fn last_forwarded_entry(header: &str) -> Option<&str> {
    header
        .rsplit(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract the content type without parameters, lowercased
pub fn extract_content_type(req: &HttpRequest) -> String {
    req.headers()
        .get("Content-Type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase()
}

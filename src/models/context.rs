//! Per-request cache of introspection results.
//!
//! Middleware and handlers may precompute values and store a
//! [`RequestCache`] in the request extensions. The extraction helpers
//! consult it first and only derive a value themselves when the cached
//! entry is missing or empty.

use crate::models::payload::RequestPayload;

#[derive(Debug, Clone, Default)]
pub struct RequestCache {
    pub ip: Option<String>,
    pub payload: Option<RequestPayload>,
    pub path: Option<String>,
    pub canonical_path: Option<String>,
}

impl RequestCache {
    pub fn cached_ip(&self) -> Option<&str> {
        non_empty(self.ip.as_deref())
    }

    pub fn cached_payload(&self) -> Option<&RequestPayload> {
        self.payload.as_ref().filter(|p| !p.is_empty())
    }

    pub fn cached_path(&self) -> Option<&str> {
        non_empty(self.path.as_deref())
    }

    pub fn cached_canonical_path(&self) -> Option<&str> {
        non_empty(self.canonical_path.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Request ID assigned by the request context middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_entries_are_not_cached_values() {
        let cache = RequestCache {
            ip: Some(String::new()),
            payload: Some(RequestPayload::default()),
            path: Some(String::new()),
            canonical_path: None,
        };

        assert!(cache.cached_ip().is_none());
        assert!(cache.cached_payload().is_none());
        assert!(cache.cached_path().is_none());
        assert!(cache.cached_canonical_path().is_none());
    }

    #[test]
    fn test_populated_entries_are_returned() {
        let cache = RequestCache {
            ip: Some("10.0.0.1".to_string()),
            payload: Some(RequestPayload::Multipart),
            path: Some("/api/users/{id}".to_string()),
            canonical_path: Some("/api/users/{id}".to_string()),
        };

        assert_eq!(cache.cached_ip(), Some("10.0.0.1"));
        assert_eq!(cache.cached_payload(), Some(&RequestPayload::Multipart));
        assert_eq!(cache.cached_path(), Some("/api/users/{id}"));
        assert_eq!(cache.cached_canonical_path(), Some("/api/users/{id}"));
    }
}

//! Request payload extraction.

use crate::{
    models::{context::RequestCache, payload::RequestPayload},
    utils::http::extract_content_type,
};
use actix_web::{HttpMessage, HttpRequest, web};
use serde_json::{Map, Value};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Extract the parameters a request was made with
///
/// A non-empty payload cached on the request is returned as is. Multipart
/// bodies are reported as [`RequestPayload::Multipart`]. Otherwise query and
/// form parameters are merged; when both are empty the body is parsed as
/// JSON.
pub fn extract_request_payload(req: &HttpRequest, body: &[u8]) -> RequestPayload {
    if let Some(payload) = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_payload().cloned())
    {
        return payload;
    }

    resolve_payload(&extract_content_type(req), req.query_string(), body)
}

/// Content-type dispatch behind [`extract_request_payload`]
pub fn resolve_payload(content_type: &str, query: &str, body: &[u8]) -> RequestPayload {
    if content_type.starts_with("multipart/") {
        return RequestPayload::Multipart;
    }

    let mut data = Map::new();
    merge_urlencoded(&mut data, query);
    if content_type.starts_with(FORM_URLENCODED) {
        if let Ok(form) = std::str::from_utf8(body) {
            merge_urlencoded(&mut data, form);
        }
    }

    if !data.is_empty() || body.is_empty() {
        return RequestPayload::Data(data);
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => RequestPayload::from_json(value),
        Err(e) => {
            tracing::debug!(error = %e, "Request body is not JSON, reporting empty payload");
            RequestPayload::Data(data)
        }
    }
}

/// Insert `key=value` pairs; later duplicates replace earlier ones
fn merge_urlencoded(data: &mut Map<String, Value>, encoded: &str) {
    if encoded.is_empty() {
        return;
    }

    match web::Query::<Vec<(String, String)>>::from_query(encoded) {
        Ok(pairs) => {
            for (key, value) in pairs.into_inner() {
                data.insert(key, Value::String(value));
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed urlencoded parameters");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use serde_json::json;

    #[test]
    fn test_multipart_returns_sentinel() {
        let payload = resolve_payload(
            "multipart/form-data; boundary=xyz",
            "a=1",
            b"--xyz\r\n",
        );
        assert_eq!(payload, RequestPayload::Multipart);
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!("multipart/form-data"));
    }

    #[test]
    fn test_json_body_with_empty_query() {
        let payload = resolve_payload("application/json", "", br#"{"a":1}"#);
        assert_eq!(payload.to_value(), json!({"a": 1}));
    }

    #[test]
    fn test_non_object_json_body_is_wrapped() {
        let payload = resolve_payload("application/json", "", b"[1,2]");
        assert_eq!(payload.to_value(), json!({"data": [1, 2]}));

        let payload = resolve_payload("application/json", "", b"7");
        assert_eq!(payload.to_value(), json!({"data": 7}));
    }

    #[test]
    fn test_invalid_json_body_yields_empty_map() {
        let payload = resolve_payload("text/plain", "", b"not json");
        assert!(payload.is_empty());
        assert_eq!(payload.to_value(), json!({}));
    }

    #[test]
    fn test_query_parameters_take_precedence_over_body() {
        let payload = resolve_payload("application/json", "page=2&size=10", br#"{"a":1}"#);
        assert_eq!(payload.to_value(), json!({"page": "2", "size": "10"}));
    }

    #[test]
    fn test_query_and_form_are_merged() {
        let payload = resolve_payload(
            "application/x-www-form-urlencoded",
            "page=1&q=a",
            b"q=b&name=foo+bar",
        );
        assert_eq!(
            payload.to_value(),
            json!({"page": "1", "q": "b", "name": "foo bar"})
        );
    }

    #[test]
    fn test_duplicate_query_keys_keep_last_value() {
        let payload = resolve_payload("", "tag=a&tag=b", b"");
        assert_eq!(payload.get_str("tag"), Some("b"));
    }

    #[test]
    fn test_empty_request_yields_empty_map() {
        let payload = resolve_payload("", "", b"");
        assert!(payload.is_empty());
    }

    #[test]
    fn test_extract_from_request() {
        let req = TestRequest::post()
            .uri("/api/login?next=%2Fhome")
            .insert_header(("Content-Type", "application/json"))
            .to_http_request();
        let payload = extract_request_payload(&req, br#"{"username":"admin"}"#);
        assert_eq!(payload.to_value(), json!({"next": "/home"}));

        let req = TestRequest::post()
            .uri("/api/login")
            .insert_header(("Content-Type", "application/json"))
            .to_http_request();
        let payload = extract_request_payload(&req, br#"{"username":"admin"}"#);
        assert_eq!(payload.get_str("username"), Some("admin"));
    }

    #[test]
    fn test_cached_payload_is_returned() {
        let req = TestRequest::post()
            .insert_header(("Content-Type", "application/json"))
            .to_http_request();
        req.extensions_mut().insert(RequestCache {
            payload: Some(RequestPayload::from_json(json!({"cached": true}))),
            ..Default::default()
        });

        let payload = extract_request_payload(&req, br#"{"a":1}"#);
        assert_eq!(payload.to_value(), json!({"cached": true}));
    }

    #[test]
    fn test_empty_cached_payload_is_ignored() {
        let req = TestRequest::post()
            .insert_header(("Content-Type", "application/json"))
            .to_http_request();
        req.extensions_mut().insert(RequestCache {
            payload: Some(RequestPayload::default()),
            ..Default::default()
        });

        let payload = extract_request_payload(&req, br#"{"a":1}"#);
        assert_eq!(payload.to_value(), json!({"a": 1}));
    }
}

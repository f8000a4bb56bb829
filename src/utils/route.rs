//! Route pattern extraction utilities.
//!
//! Concrete request paths such as `/api/users/42` are folded back into
//! templates such as `/api/users/{id}` so that logs and metrics group
//! requests by endpoint instead of by resource instance.

use crate::models::context::RequestCache;
use actix_web::{HttpMessage, HttpRequest};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Placeholder substituted for positional arguments and `pk`
pub const ID_PLACEHOLDER: &str = "{id}";

/// Metric route label for requests no resource matched
pub const UNMATCHED_ROUTE: &str = "/unknown";

/// One positional argument handed to [`extract_request_path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathArg {
    Value(String),
    List(Vec<String>),
    /// Only the values are used
    Map(Vec<(String, String)>),
}

impl PathArg {
    fn values(&self) -> Vec<&str> {
        match self {
            PathArg::Value(value) => vec![value.as_str()],
            PathArg::List(values) => values.iter().map(String::as_str).collect(),
            PathArg::Map(entries) => entries.iter().map(|(_, v)| v.as_str()).collect(),
        }
    }
}

impl From<&str> for PathArg {
    fn from(value: &str) -> Self {
        PathArg::Value(value.to_string())
    }
}

impl From<String> for PathArg {
    fn from(value: String) -> Self {
        PathArg::Value(value)
    }
}

impl From<Vec<String>> for PathArg {
    fn from(values: Vec<String>) -> Self {
        PathArg::List(values)
    }
}

impl From<Vec<&str>> for PathArg {
    fn from(values: Vec<&str>) -> Self {
        PathArg::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<HashMap<String, String>> for PathArg {
    fn from(map: HashMap<String, String>) -> Self {
        PathArg::Map(map.into_iter().collect())
    }
}

/// Template the request path using explicit argument values
///
/// Every `/<value>` occurrence becomes `/{id}`. A non-empty path cached on
/// the request takes precedence.
pub fn extract_request_path(req: &HttpRequest, args: &[PathArg]) -> String {
    if let Some(path) = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_path().map(str::to_string))
    {
        return path;
    }

    let values: Vec<&str> = args.iter().flat_map(PathArg::values).collect();
    template_path(&decoded_path(req), &values)
}

/// Request path with percent-escapes decoded, matching router captures
fn decoded_path(req: &HttpRequest) -> String {
    percent_decode_str(req.path())
        .decode_utf8_lossy()
        .into_owned()
}

/// Replace `/<value>` with `/{id}` for each non-empty value, in order
pub fn template_path(path: &str, values: &[&str]) -> String {
    let mut templated = path.to_string();
    for value in values.iter().filter(|v| !v.is_empty()) {
        templated = templated.replace(&format!("/{value}"), &format!("/{ID_PLACEHOLDER}"));
    }
    templated
}

/// Arguments captured by the router for the matched resource
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverMatch {
    pub args: Vec<String>,
    pub kwargs: Vec<(String, String)>,
}

impl ResolverMatch {
    /// Build from the router's match info
    ///
    /// Actix names every dynamic segment, so all captures become keyword
    /// arguments.
    pub fn from_request(req: &HttpRequest) -> Self {
        let kwargs = req
            .match_info()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        Self {
            args: Vec::new(),
            kwargs,
        }
    }
}

/// Template the request path from the router's captures
///
/// A non-empty canonical path cached on the request takes precedence.
pub fn extract_canonical_path(req: &HttpRequest) -> String {
    if let Some(path) = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_canonical_path().map(str::to_string))
    {
        return path;
    }

    canonicalize_path(&decoded_path(req), &ResolverMatch::from_request(req))
}

/// Positional captures become `{id}`; keyword captures become `{name}`,
/// except `pk` which becomes `{id}`
pub fn canonicalize_path(path: &str, resolver_match: &ResolverMatch) -> String {
    let mut canonical = path.to_string();

    for value in &resolver_match.args {
        canonical = canonical.replace(&format!("/{value}"), &format!("/{ID_PLACEHOLDER}"));
    }

    for (key, value) in &resolver_match.kwargs {
        let placeholder = if key == "pk" {
            ID_PLACEHOLDER.to_string()
        } else {
            format!("{{{key}}}")
        };
        canonical = canonical.replace(&format!("/{value}"), &format!("/{placeholder}"));
    }

    canonical
}

/// Extract route pattern from request for metric labels
///
/// Uses the canonical path for routed requests. Requests that matched no
/// resource are all reported as `/unknown`, so unrouted paths never mint
/// new series.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    let cached = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_canonical_path().map(str::to_string));
    if let Some(path) = cached {
        return path;
    }

    if req.match_pattern().is_none() {
        return UNMATCHED_ROUTE.to_string();
    }

    extract_canonical_path(req)
}

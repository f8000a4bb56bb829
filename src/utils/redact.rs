//! Redaction of sensitive values before payloads reach the logs.

use regex::Regex;
use std::sync::LazyLock;

/// JSON fields whose scalar values never appear in logs
static SENSITIVE_FIELDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)("(?:password|old_password|new_password|token|access|refresh|secret|api[_-]?key|authorization)"\s*:\s*)(?:"(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|true|false)"#,
    )
    .expect("sensitive field pattern is valid")
});

/// Free-text patterns masked wherever they occur
static SENSITIVE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b", // Email addresses
        r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",         // Card numbers
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const REDACTED: &str = "[REDACTED]";

/// Redact sensitive data from a serialized payload
pub fn redact_sensitive_data(input: &str) -> String {
    let mut result = SENSITIVE_FIELDS
        .replace_all(input, format!(r#"${{1}}"{REDACTED}""#).as_str())
        .into_owned();

    for re in SENSITIVE_PATTERNS.iter() {
        result = re.replace_all(&result, REDACTED).into_owned();
    }

    result
}

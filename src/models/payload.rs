//! Request payload representation.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Sentinel reported in place of multipart bodies
pub const MULTIPART_SENTINEL: &str = "multipart/form-data";

/// Parameters submitted with a request
///
/// Multipart uploads are not decoded; they are reported through the
/// [`MULTIPART_SENTINEL`] string so that audit records stay small and
/// field checks on upload forms do not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Multipart,
    Data(Map<String, Value>),
}

impl RequestPayload {
    /// Wrap an arbitrary JSON value, keeping objects as they are
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => RequestPayload::Data(map),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                RequestPayload::Data(map)
            }
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestPayload::Multipart)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestPayload::Multipart => false,
            RequestPayload::Data(map) => map.is_empty(),
        }
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestPayload::Multipart => None,
            RequestPayload::Data(map) => map.get(key),
        }
    }

    /// Look up a top-level string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestPayload::Multipart => Value::String(MULTIPART_SENTINEL.to_string()),
            RequestPayload::Data(map) => Value::Object(map.clone()),
        }
    }
}

impl Default for RequestPayload {
    fn default() -> Self {
        RequestPayload::Data(Map::new())
    }
}

impl Serialize for RequestPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RequestPayload::Multipart => serializer.serialize_str(MULTIPART_SENTINEL),
            RequestPayload::Data(map) => map.serialize(serializer),
        }
    }
}

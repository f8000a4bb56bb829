//! IP geolocation records.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Geolocation summary for an IP address
///
/// Every field is a string and defaults to empty; the all-empty record is
/// what callers receive whenever a lookup is skipped or fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Apiv2Schema)]
#[serde(default)]
pub struct IpAnalysis {
    #[serde(deserialize_with = "lenient_string")]
    pub continent: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(deserialize_with = "lenient_string")]
    pub province: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub district: String,
    #[serde(deserialize_with = "lenient_string")]
    pub isp: String,
    #[serde(deserialize_with = "lenient_string")]
    pub area_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country_english: String,
    #[serde(deserialize_with = "lenient_string")]
    pub country_code: String,
    #[serde(deserialize_with = "lenient_string")]
    pub longitude: String,
    #[serde(deserialize_with = "lenient_string")]
    pub latitude: String,
}

impl IpAnalysis {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Envelope returned by the remote analysis endpoint
#[derive(Debug, Deserialize)]
pub struct IpAnalysisEnvelope {
    pub code: i64,
    #[serde(default)]
    pub data: Option<IpAnalysis>,
}

/// Accept strings, numbers and null for a string field
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

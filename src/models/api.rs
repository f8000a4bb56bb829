//! API response models for standard endpoints.

use crate::models::{payload::RequestPayload, user::RequestUser};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Response model for the health check endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response model for the version information endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct VersionResponse {
    pub version: String,
    pub commit: String,
    pub build_time: String,
}

/// Query parameters for the IP analysis endpoint
#[derive(Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct IpAnalysisQuery {
    /// Address to look up; the caller's own address when omitted
    pub ip: Option<String>,
}

/// Everything the introspection helpers derive from one request
#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub request_id: Option<String>,
    pub method: String,
    pub ip: String,
    pub browser: String,
    pub os: String,
    pub path: String,
    pub request_path: String,
    pub canonical_path: String,
    pub payload: RequestPayload,
    pub user: RequestUser,
    pub verbose_name: String,
}

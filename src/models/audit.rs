//! Operation log records emitted once per handled request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome classification derived from the response status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    Success,
    ClientError,
    ServerError,
}

impl OperationOutcome {
    pub fn from_status(status: u16) -> Self {
        match status {
            500..=u16::MAX => OperationOutcome::ServerError,
            400..=499 => OperationOutcome::ClientError,
            _ => OperationOutcome::Success,
        }
    }
}

/// Structured operation log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationLogEvent {
    pub timestamp: DateTime<Utc>,
    pub request_id: Option<String>,
    pub method: String,
    pub path: String,
    pub canonical_path: String,
    pub ip_address: String,
    pub browser: String,
    pub os: String,
    pub user_id: Option<String>,
    pub username: String,
    pub resource: String,
    pub status: u16,
    pub outcome: OperationOutcome,
    pub duration_ms: u128,
    pub payload: Option<String>,
}

impl OperationLogEvent {
    /// Create a new event with the request line and caller address
    pub fn new(method: String, path: String, canonical_path: String, ip_address: String) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: None,
            method,
            path,
            canonical_path,
            ip_address,
            browser: String::new(),
            os: String::new(),
            user_id: None,
            username: String::new(),
            resource: String::new(),
            status: 0,
            outcome: OperationOutcome::Success,
            duration_ms: 0,
            payload: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_client(mut self, browser: String, os: String) -> Self {
        self.browser = browser;
        self.os = os;
        self
    }

    pub fn with_user(mut self, user_id: Option<String>, username: String) -> Self {
        self.user_id = user_id;
        self.username = username;
        self
    }

    /// Model verbose name of the resource the request touched
    pub fn with_resource(mut self, resource: String) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_status(mut self, status: u16, duration_ms: u128) -> Self {
        self.status = status;
        self.outcome = OperationOutcome::from_status(status);
        self.duration_ms = duration_ms;
        self
    }

    /// Attach an already redacted payload rendering
    pub fn with_payload(mut self, payload: Option<String>) -> Self {
        self.payload = payload;
        self
    }

    /// Log the event using structured logging
    pub fn log(&self) {
        info!(
            target: "operation_log",
            timestamp = %self.timestamp,
            request_id = ?self.request_id,
            method = %self.method,
            path = %self.path,
            canonical_path = %self.canonical_path,
            ip_address = %self.ip_address,
            browser = %self.browser,
            os = %self.os,
            user_id = ?self.user_id,
            username = %self.username,
            resource = %self.resource,
            status = self.status,
            outcome = ?self.outcome,
            duration_ms = %self.duration_ms,
            payload = ?self.payload,
            "Operation log event"
        );
    }
}

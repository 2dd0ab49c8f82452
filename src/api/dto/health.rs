//! DTOs for health check endpoint.

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Health check response with component status.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Health status for each system component.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub notification_queue: CheckStatus,
    pub key_material: CheckStatus,
}

/// Individual component health status.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: String,
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

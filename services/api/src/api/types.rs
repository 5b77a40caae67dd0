//! HTTP API response types.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub externals: ExternalStatus,
}

/// Which external handles were configured at bootstrap.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExternalStatus {
    pub database: bool,
    pub media_storage: bool,
}

use serde::{Deserialize, Serialize};
use crate::models::domain::Profile;

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub matches: Vec<Profile>,
    pub total: usize,
    pub requester_location: String,
    pub skipped: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(default)]
    pub retryable: bool,
}

/// Connect response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub success: bool,
    pub request_id: String,
}

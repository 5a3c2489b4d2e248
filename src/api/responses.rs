//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::CountdownState;

/// Request body for setting a clock field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetFieldRequest {
    pub value: i64,
}

/// API response structure for command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, countdown: CountdownState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }

    /// The command changed the countdown
    pub fn applied(message: String, countdown: CountdownState) -> Self {
        Self::new("applied".to_string(), message, countdown)
    }

    /// The command was a guarded no-op
    pub fn ignored(message: String, countdown: CountdownState) -> Self {
        Self::new("ignored".to_string(), message, countdown)
    }
}

/// Status response with derived countdown flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownState,
    pub display: String,
    pub total_seconds: u32,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_finished: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

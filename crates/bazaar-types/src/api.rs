//! API request/response envelopes

use serde::{Deserialize, Serialize};

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ApiErrorDetail,
}

/// API error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Error code (e.g., `UNAUTHORIZED`, `NOT_FOUND`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorBody {
    /// Create a new error envelope
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// Plain confirmation body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

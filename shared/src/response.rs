//! Store response envelope
//!
//! Every reservation-store operation answers with the same JSON shape:
//! ```json
//! {
//!     "success": true,
//!     "message": "...",
//!     "result": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Unified response envelope returned by the reservation store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was accepted by the store
    pub success: bool,
    /// Human-readable message (error description on rejection)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(result: T) -> Self {
        Self {
            success: true,
            message: None,
            result: Some(result),
        }
    }

    /// Create a successful response with a message
    pub fn ok_with_message(result: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            result: Some(result),
        }
    }

    /// Create a rejection response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            result: None,
        }
    }

    /// The server message, or `default` when the store sent none
    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(default)
    }
}

/// Empty result for void operations
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Empty;

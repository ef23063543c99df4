//! Shared response envelope for API handlers.
//!
//! All responses use a `{ "success": bool, "message": ..., "data": ... }`
//! envelope. Use [`ApiResponse`] instead of ad-hoc `serde_json::json!`
//! to get compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard response envelope.
///
/// `message` and `data` are omitted from the JSON when absent.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope with a payload and no message.
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful envelope with a human-readable message and a payload.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful envelope carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

//! Device metadata model and DTOs.

use sqlx::FromRow;
use storefront_core::types::{EntityId, Timestamp};

/// Descriptive device metadata attached 1:1 to a session.
///
/// Purely informational -- device binding itself is enforced through
/// `sessions.device_id`, not through anything stored here.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceInfo {
    pub id: EntityId,
    pub session_id: EntityId,
    pub device_type: Option<String>,
    pub device_model: Option<String>,
    pub device_os: Option<String>,
    pub device_os_version: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or overwriting device metadata keyed by `session_id`.
pub struct UpsertDeviceInfo {
    pub session_id: EntityId,
    pub device_type: Option<String>,
    pub device_model: Option<String>,
    pub device_os: Option<String>,
    pub device_os_version: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

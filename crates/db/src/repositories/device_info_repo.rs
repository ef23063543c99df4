//! Repository for the `device_info` table.

use sqlx::PgPool;
use storefront_core::types::EntityId;

use crate::models::device_info::{DeviceInfo, UpsertDeviceInfo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, device_type, device_model, device_os, \
                        device_os_version, user_agent, ip_address, created_at, updated_at";

/// Provides upsert/lookup operations for per-session device metadata.
pub struct DeviceInfoRepo;

impl DeviceInfoRepo {
    /// Insert device metadata, or overwrite the existing row for the
    /// same session (`uq_device_info_session` conflict target).
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertDeviceInfo,
    ) -> Result<DeviceInfo, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_info
                (session_id, device_type, device_model, device_os, device_os_version, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (session_id) DO UPDATE SET
                device_type = EXCLUDED.device_type,
                device_model = EXCLUDED.device_model,
                device_os = EXCLUDED.device_os,
                device_os_version = EXCLUDED.device_os_version,
                user_agent = EXCLUDED.user_agent,
                ip_address = EXCLUDED.ip_address,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeviceInfo>(&query)
            .bind(input.session_id)
            .bind(&input.device_type)
            .bind(&input.device_model)
            .bind(&input.device_os)
            .bind(&input.device_os_version)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find the device metadata attached to a session, if any.
    pub async fn find_by_session_id(
        pool: &PgPool,
        session_id: EntityId,
    ) -> Result<Option<DeviceInfo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_info WHERE session_id = $1");
        sqlx::query_as::<_, DeviceInfo>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }
}

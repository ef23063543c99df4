//! Session model and DTOs.

use sqlx::FromRow;
use storefront_core::types::{EntityId, Timestamp};

/// A session row from the `sessions` table: one authenticated device
/// binding for an account.
///
/// Tokens are stored as SHA-256 hex digests; a database leak must not
/// yield usable bearer credentials. `expires_at` is the refresh-token
/// expiry. Revocation is a flag, never a row deletion (audit trail).
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: EntityId,
    pub account_id: EntityId,
    pub device_id: String,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub is_revoked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing a session keyed by `(account_id, device_id)`.
pub struct UpsertSession {
    pub account_id: EntityId,
    pub device_id: String,
    pub access_token_hash: String,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}

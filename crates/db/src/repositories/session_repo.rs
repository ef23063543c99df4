//! Repository for the `sessions` table.

use sqlx::PgPool;
use storefront_core::types::EntityId;

use crate::models::session::{Session, UpsertSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, account_id, device_id, access_token_hash, refresh_token_hash, \
                        expires_at, is_revoked, created_at, updated_at";

/// Provides CRUD operations for sessions.
///
/// The `uq_sessions_account_device` constraint is the conflict target
/// for [`SessionRepo::upsert`]: at most one row per (account, device),
/// with last-write-wins on the token columns. Two concurrent logins
/// from the same device race here and the later statement's pair
/// survives -- the service does not serialize logins per device.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a session, or replace the token pair of the existing row
    /// for the same `(account_id, device_id)`.
    ///
    /// A replaced row also has `is_revoked` reset to false, so a fresh
    /// login revives a previously revoked device binding.
    pub async fn upsert(pool: &PgPool, input: &UpsertSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (account_id, device_id, access_token_hash, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (account_id, device_id) DO UPDATE SET
                access_token_hash = EXCLUDED.access_token_hash,
                refresh_token_hash = EXCLUDED.refresh_token_hash,
                expires_at = EXCLUDED.expires_at,
                is_revoked = false,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.account_id)
            .bind(&input.device_id)
            .bind(&input.access_token_hash)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its access token digest.
    ///
    /// Includes revoked rows: logout must stay idempotent, so the
    /// caller can still locate an already-revoked session.
    pub async fn find_by_access_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE access_token_hash = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-revoked session by its refresh token digest.
    ///
    /// Revoked sessions are excluded (a revoked refresh token is
    /// permanently dead). Expired rows are NOT filtered here: expiry is
    /// checked lazily by the session manager so it can revoke the row
    /// and report the terminal state to the caller.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE refresh_token_hash = $1
               AND is_revoked = false"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a single session by id. Returns `true` if the row was updated.
    pub async fn revoke(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true, updated_at = NOW()
             WHERE id = $1 AND is_revoked = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke the session holding the given access token digest.
    ///
    /// Idempotent: revoking an already-revoked session affects zero
    /// rows and is not an error.
    pub async fn revoke_by_access_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET is_revoked = true, updated_at = NOW()
             WHERE access_token_hash = $1 AND is_revoked = false",
        )
        .bind(hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

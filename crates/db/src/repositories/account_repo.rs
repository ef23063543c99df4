//! Repository for the `accounts` table.

use sqlx::PgPool;
use storefront_core::types::EntityId;

use crate::models::account::{Account, UpsertAccount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, email, user_type, password_hash, created_at, updated_at";

/// Provides CRUD operations for accounts.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert an account, or overwrite name/email/user_type if the id
    /// already exists (last-write-wins on those columns).
    ///
    /// An empty `password_hash` leaves the stored hash untouched, so an
    /// update without a password does not lock the account out.
    pub async fn upsert(pool: &PgPool, input: &UpsertAccount) -> Result<Account, sqlx::Error> {
        let query = format!(
            "INSERT INTO accounts (id, name, email, user_type, password_hash)
             VALUES ($1, NULLIF($2, ''), $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                name = NULLIF($2, ''),
                email = $3,
                user_type = $4,
                password_hash = COALESCE(NULLIF($5, ''), accounts.password_hash),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(input.id)
            .bind(input.name.as_deref().unwrap_or(""))
            .bind(&input.email)
            .bind(input.user_type)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find an account by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE id = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an account by email (case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Account>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM accounts WHERE email = $1");
        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List accounts, newest first, with offset/limit pagination.
    ///
    /// Page-size clamping is a service-layer concern; this takes the
    /// already-clamped values.
    pub async fn list(pool: &PgPool, skip: i64, take: i64) -> Result<Vec<Account>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM accounts
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(take)
            .bind(skip)
            .fetch_all(pool)
            .await
    }

    /// Check whether an account with the given email exists.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }
}

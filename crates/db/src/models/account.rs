//! Account entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storefront_core::types::{EntityId, Timestamp};

/// Closed set of account roles carried as a claim on every account.
///
/// Maps to the `user_type` Postgres enum. Purely informational in this
/// subsystem -- no authorization decisions are made from it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_type", rename_all = "snake_case")]
pub enum UserType {
    SuperAdmin,
    Admin,
    Merchant,
    Customer,
}

/// Full account row from the `accounts` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`AccountResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: EntityId,
    pub name: Option<String>,
    pub email: String,
    pub user_type: UserType,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe account representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: EntityId,
    pub name: Option<String>,
    pub email: String,
    pub user_type: UserType,
    pub created_at: Timestamp,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id,
            name: account.name,
            email: account.email,
            user_type: account.user_type,
            created_at: account.created_at,
        }
    }
}

/// DTO for inserting or overwriting an account keyed by `id`.
///
/// An empty `password_hash` means "keep the stored hash" on update.
pub struct UpsertAccount {
    pub id: EntityId,
    pub name: Option<String>,
    pub email: String,
    pub user_type: UserType,
    pub password_hash: String,
}

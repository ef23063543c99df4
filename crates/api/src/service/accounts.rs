//! The account service facade: upsert, fetch, list, email probe.

use serde::Deserialize;
use sqlx::PgPool;
use storefront_core::error::CoreError;
use storefront_core::types::EntityId;
use storefront_db::models::account::{AccountResponse, UpsertAccount, UserType};
use storefront_db::repositories::AccountRepo;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Maximum (and default) page size for account listings.
const MAX_PAGE_SIZE: i64 = 100;

/// Input for [`create_or_update_account`].
///
/// `id` absent means "create" (the service assigns one). A `password`
/// of `None` or `""` on an update keeps the stored hash.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrUpdateAccount {
    pub id: Option<EntityId>,
    #[validate(length(min = 3, max = 50, message = "name must be 3-50 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub user_type: UserType,
    #[validate(length(min = 8, max = 50, message = "password must be 8-50 characters"))]
    pub password: Option<String>,
}

/// Create an account, or overwrite the one with the given id.
///
/// Assigns a UUID v7 when `id` is absent, hashes the password only when
/// one was supplied. Email uniqueness is the store's concern
/// (`uq_accounts_email`), not checked here.
pub async fn create_or_update_account(
    pool: &PgPool,
    input: CreateOrUpdateAccount,
) -> AppResult<AccountResponse> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(flatten_validation_errors(&e))))?;

    let id = input.id.unwrap_or_else(uuid::Uuid::now_v7);

    let password_hash = match input.password.as_deref() {
        Some(password) if !password.is_empty() => hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        _ => String::new(), // keep the stored hash (or none, on create)
    };

    let upsert = UpsertAccount {
        id,
        name: input.name,
        email: input.email,
        user_type: input.user_type,
        password_hash,
    };
    let account = AccountRepo::upsert(pool, &upsert).await?;

    tracing::info!(account_id = %account.id, "account upserted");
    Ok(account.into())
}

/// Fetch a single account by id.
pub async fn get_account_by_id(pool: &PgPool, id: EntityId) -> AppResult<AccountResponse> {
    let account = AccountRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Account",
            id,
        }))?;
    Ok(account.into())
}

/// List accounts with offset/limit pagination.
///
/// `take` is clamped to [`MAX_PAGE_SIZE`]; when both arguments are zero
/// the caller gets the default (maximum) page.
pub async fn list_accounts(
    pool: &PgPool,
    skip: i64,
    take: i64,
) -> AppResult<Vec<AccountResponse>> {
    let take = if take > MAX_PAGE_SIZE || (skip == 0 && take == 0) {
        MAX_PAGE_SIZE
    } else {
        take.max(0)
    };

    let accounts = AccountRepo::list(pool, skip.max(0), take).await?;
    Ok(accounts.into_iter().map(Into::into).collect())
}

/// Check whether an account with the given email exists.
pub async fn check_email_exists(pool: &PgPool, email: &str) -> AppResult<bool> {
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "email is required".into(),
        )));
    }
    Ok(AccountRepo::email_exists(pool, email).await?)
}

/// Flatten `validator` errors into one human-readable line.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

//! Handlers for the `/accounts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_core::types::EntityId;
use storefront_db::models::account::AccountResponse;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::service::accounts::{self, CreateOrUpdateAccount};
use crate::state::AppState;

/// Query parameters for `GET /accounts`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub take: i64,
}

/// Query parameters for `GET /accounts/check-email`.
#[derive(Debug, Deserialize)]
pub struct CheckEmailParams {
    #[serde(default)]
    pub email: String,
}

/// Payload for the check-email response.
#[derive(Debug, Serialize)]
pub struct EmailExists {
    pub exists: bool,
}

/// POST /api/v1/accounts
///
/// Create an account, or overwrite the one with the supplied id.
/// Returns 201 on create (no id supplied), 200 on update.
pub async fn create_or_update(
    State(state): State<AppState>,
    Json(input): Json<CreateOrUpdateAccount>,
) -> AppResult<(StatusCode, Json<ApiResponse<AccountResponse>>)> {
    let status = if input.id.is_none() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let account = accounts::create_or_update_account(&state.pool, input).await?;
    Ok((status, Json(ApiResponse::data(account))))
}

/// GET /api/v1/accounts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<ApiResponse<AccountResponse>>> {
    let account = accounts::get_account_by_id(&state.pool, id).await?;
    Ok(Json(ApiResponse::data(account)))
}

/// GET /api/v1/accounts?skip=&take=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<ApiResponse<Vec<AccountResponse>>>> {
    let page = accounts::list_accounts(&state.pool, params.skip, params.take).await?;
    Ok(Json(ApiResponse::data(page)))
}

/// GET /api/v1/accounts/check-email?email=
pub async fn check_email(
    State(state): State<AppState>,
    Query(params): Query<CheckEmailParams>,
) -> AppResult<Json<ApiResponse<EmailExists>>> {
    let exists = accounts::check_email_exists(&state.pool, &params.email).await?;

    let message = if exists {
        "Email already exists"
    } else {
        "Email is available"
    };
    Ok(Json(ApiResponse::with_message(message, EmailExists { exists })))
}

//! Handlers for the `/auth` resource (login, refresh, logout).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::{BearerToken, DeviceHeaders};
use crate::response::ApiResponse;
use crate::service::sessions::{self, AuthenticatedResponse};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Requires the `X-Device-ID`
/// header; device descriptor headers are recorded when present.
pub async fn login(
    State(state): State<AppState>,
    device: DeviceHeaders,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthenticatedResponse>>> {
    let response = sessions::login(
        &state.pool,
        &state.config.jwt,
        &input.email,
        &input.password,
        &device,
    )
    .await?;

    Ok(Json(ApiResponse::with_message("Login successful", response)))
}

/// POST /api/v1/auth/logout
///
/// Revoke the session holding the presented Bearer access token.
/// Requires the `X-Device-ID` header matching the session's binding.
pub async fn logout(
    State(state): State<AppState>,
    device: DeviceHeaders,
    BearerToken(access_token): BearerToken,
) -> AppResult<Json<ApiResponse<()>>> {
    sessions::logout(
        &state.pool,
        &state.config.jwt,
        &access_token,
        &device.device_id,
    )
    .await?;

    Ok(Json(ApiResponse::message("Logged out successfully")))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for a new access + refresh pair.
/// Requires the `X-Device-ID` header matching the session's binding.
pub async fn refresh(
    State(state): State<AppState>,
    device: DeviceHeaders,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<ApiResponse<AuthenticatedResponse>>> {
    let response = sessions::refresh(
        &state.pool,
        &state.config.jwt,
        &input.refresh_token,
        &device.device_id,
    )
    .await?;

    Ok(Json(ApiResponse::with_message(
        "Token refreshed successfully",
        response,
    )))
}

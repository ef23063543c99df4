//! The session manager: login, logout, refresh.
//!
//! State machine per (account, device): NoSession -> Active -> Revoked,
//! where a successful refresh is an Active -> Active self-transition
//! that rotates both tokens and extends the session expiry.
//!
//! All failure modes a caller could use as an oracle (bad signature,
//! expired token, unknown session, revoked session, vanished account)
//! collapse into [`CoreError::InvalidToken`]; only device mismatch and
//! terminal refresh expiry are reported distinctly, and neither reveals
//! whether the presented token was otherwise valid for another device.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use storefront_core::error::CoreError;
use storefront_db::models::account::AccountResponse;
use storefront_db::models::device_info::UpsertDeviceInfo;
use storefront_db::models::session::{Session, UpsertSession};
use storefront_db::repositories::{AccountRepo, DeviceInfoRepo, SessionRepo};

use crate::auth::jwt::{issue_token, token_digest, verify_token};
use crate::auth::password::verify_password;
use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::extract::DeviceHeaders;

/// Result of a successful login or refresh: the account (hash cleared)
/// plus a freshly minted token pair.
#[derive(Debug, Serialize)]
pub struct AuthenticatedResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Authenticate an account and bind a session to the calling device.
///
/// A prior session for the same (account, device) is silently replaced:
/// its token pair stops matching any stored digest the moment the
/// upsert commits. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
    device: &DeviceHeaders,
) -> AppResult<AuthenticatedResponse> {
    let account = AccountRepo::find_by_email(pool, email)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidCredentials))?;

    if !verify_password(password, &account.password_hash) {
        return Err(AppError::Core(CoreError::InvalidCredentials));
    }

    let (response, session) =
        establish_session(pool, jwt, account.into(), &device.device_id).await?;

    if device.has_descriptors() {
        DeviceInfoRepo::upsert(pool, &device_info_input(session.id, device)).await?;
    }

    tracing::info!(
        account_id = %response.account.id,
        device_id = %device.device_id,
        "login succeeded"
    );
    Ok(response)
}

/// Revoke the session holding the presented access token.
///
/// Idempotent: logging out an already-revoked session succeeds. The
/// token must verify and the session must be bound to the calling
/// device.
pub async fn logout(
    pool: &PgPool,
    jwt: &JwtConfig,
    access_token: &str,
    device_id: &str,
) -> AppResult<()> {
    verify_token(access_token, jwt).map_err(|_| AppError::Core(CoreError::InvalidToken))?;

    let digest = token_digest(access_token);
    let session = SessionRepo::find_by_access_token_hash(pool, &digest)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidToken))?;

    if session.device_id != device_id {
        return Err(AppError::Core(CoreError::DeviceMismatch));
    }

    SessionRepo::revoke_by_access_token_hash(pool, &digest).await?;

    tracing::info!(
        account_id = %session.account_id,
        device_id = %device_id,
        "session revoked"
    );
    Ok(())
}

/// Exchange a refresh token for a new token pair (rotation).
///
/// The old refresh token stops working as soon as the session row is
/// overwritten -- lookups match only the newest digest. A session whose
/// `expires_at` has passed is revoked as a side effect and the call
/// fails with the terminal [`CoreError::RefreshExpired`]; any later
/// attempt with the same token answers plain `InvalidToken`.
pub async fn refresh(
    pool: &PgPool,
    jwt: &JwtConfig,
    refresh_token: &str,
    device_id: &str,
) -> AppResult<AuthenticatedResponse> {
    verify_token(refresh_token, jwt).map_err(|_| AppError::Core(CoreError::InvalidToken))?;

    let session = SessionRepo::find_by_refresh_token_hash(pool, &token_digest(refresh_token))
        .await?
        .ok_or(AppError::Core(CoreError::InvalidToken))?;

    if session.device_id != device_id {
        return Err(AppError::Core(CoreError::DeviceMismatch));
    }

    if session.expires_at < Utc::now() {
        SessionRepo::revoke(pool, session.id).await?;
        tracing::info!(
            account_id = %session.account_id,
            device_id = %device_id,
            "session expired at refresh, revoked"
        );
        return Err(AppError::Core(CoreError::RefreshExpired));
    }

    let account = AccountRepo::find_by_id(pool, session.account_id)
        .await?
        .ok_or(AppError::Core(CoreError::InvalidToken))?;

    let (response, _session) = establish_session(pool, jwt, account.into(), device_id).await?;

    tracing::debug!(
        account_id = %response.account.id,
        device_id = %device_id,
        "token pair rotated"
    );
    Ok(response)
}

/// Mint a token pair and upsert the session row for (account, device).
///
/// Shared by login and refresh: both end in the same Active state with
/// a fresh pair and `expires_at = now + refresh TTL`.
async fn establish_session(
    pool: &PgPool,
    jwt: &JwtConfig,
    account: AccountResponse,
    device_id: &str,
) -> AppResult<(AuthenticatedResponse, Session)> {
    let access_token = issue_token(account.id, &account.email, jwt, jwt.access_ttl())
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh_token = issue_token(account.id, &account.email, jwt, jwt.refresh_ttl())
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let session_input = UpsertSession {
        account_id: account.id,
        device_id: device_id.to_string(),
        access_token_hash: token_digest(&access_token),
        refresh_token_hash: token_digest(&refresh_token),
        expires_at: Utc::now() + jwt.refresh_ttl(),
    };
    let session = SessionRepo::upsert(pool, &session_input).await?;

    let response = AuthenticatedResponse {
        account,
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expiry_mins * 60,
    };
    Ok((response, session))
}

fn device_info_input(session_id: uuid::Uuid, device: &DeviceHeaders) -> UpsertDeviceInfo {
    UpsertDeviceInfo {
        session_id,
        device_type: device.device_type.clone(),
        device_model: device.device_model.clone(),
        device_os: device.device_os.clone(),
        device_os_version: device.device_os_version.clone(),
        user_agent: device.user_agent.clone(),
        ip_address: device.ip_address.clone(),
    }
}

//! Request extractors for device binding and bearer tokens.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storefront_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Device identity and descriptor headers sent by clients on
/// login/logout/refresh calls.
///
/// `X-Device-ID` is mandatory (400 when missing); the descriptor
/// headers are optional and only recorded, never used for
/// authorization. The client IP is taken from `X-Forwarded-For` when
/// the reverse proxy supplies it.
#[derive(Debug, Clone)]
pub struct DeviceHeaders {
    pub device_id: String,
    pub device_type: Option<String>,
    pub device_model: Option<String>,
    pub device_os: Option<String>,
    pub device_os_version: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl DeviceHeaders {
    /// Whether any descriptor field (beyond the id) was supplied.
    pub fn has_descriptors(&self) -> bool {
        self.device_type.is_some()
            || self.device_model.is_some()
            || self.device_os.is_some()
            || self.device_os_version.is_some()
            || self.user_agent.is_some()
            || self.ip_address.is_some()
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl FromRequestParts<AppState> for DeviceHeaders {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let device_id = header_value(parts, "x-device-id").ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "X-Device-ID header is required".into(),
            ))
        })?;

        Ok(DeviceHeaders {
            device_id,
            device_type: header_value(parts, "x-device-type"),
            device_model: header_value(parts, "x-device-model"),
            device_os: header_value(parts, "x-device-os"),
            device_os_version: header_value(parts, "x-device-os-version"),
            user_agent: header_value(parts, "user-agent"),
            ip_address: header_value(parts, "x-forwarded-for"),
        })
    }
}

/// Raw bearer token extracted from the `Authorization` header.
///
/// Verification happens in the session manager, not here -- logout
/// needs the raw token to locate the session row by digest.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Core(CoreError::InvalidToken))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Core(CoreError::InvalidToken))?;

        Ok(BearerToken(token.to_string()))
    }
}

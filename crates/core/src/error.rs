use crate::types::EntityId;

/// Domain error taxonomy shared by the service and transport layers.
///
/// `InvalidCredentials` is deliberately a unit variant with a fixed
/// message: callers must not be able to tell "unknown email" apart from
/// "wrong password". Likewise `InvalidToken` covers signature failures,
/// expired tokens, and sessions that no longer exist, so a presented
/// token leaks nothing about server-side state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token is bound to a different device")]
    DeviceMismatch,

    #[error("refresh token has expired, please log in again")]
    RefreshExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

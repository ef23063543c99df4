//! Signed bearer-token codec.
//!
//! Access and refresh tokens are both HS256-signed JWTs carrying a
//! [`Claims`] payload; they differ only in TTL. Only the SHA-256 digest
//! of a token is stored server-side (see [`token_digest`]) so a
//! database leak does not yield usable bearer credentials.
//!
//! Verification is a pure function of (token, secret, now) -- no store
//! access happens here.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::JwtConfig;

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the account id.
    pub sub: Uuid,
    /// The account's email address.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Not-before time (UTC Unix timestamp).
    pub nbf: i64,
    /// Unique token identifier (UUID v4). Guarantees that two tokens
    /// issued within the same clock second still differ.
    pub jti: String,
}

/// Why a presented token failed verification.
///
/// Transport layers collapse all of these into a single externally
/// visible "invalid token" answer; the distinction exists for logging
/// and tests.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not yet valid")]
    NotYetValid,
    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Malformed,
        }
    }
}

/// Issue an HS256 token for the given account with the given lifetime.
///
/// Embeds `iat = nbf = now` and `exp = now + ttl`, plus a fresh `jti`,
/// so distinct calls always produce distinct tokens.
pub fn issue_token(
    account_id: Uuid,
    email: &str,
    config: &JwtConfig,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: account_id,
        email: email.to_string(),
        exp: now + ttl.num_seconds(),
        iat: now,
        nbf: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Checks the signature, `exp`, and `nbf` claims.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a token.
///
/// Use this to compare a presented token against the stored digest.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

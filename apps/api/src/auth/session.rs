//! JWT session token creation and verification.

use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

/// The authenticated caller, as carried in the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&UserRow> for SessionUser {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &SessionUser, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            exp: now + ttl.as_secs() as i64,
            iat: now,
        }
    }
}

impl From<SessionClaims> for SessionUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// Create a signed (HS256) session token for `user`.
pub fn create_session_token(
    user: &SessionUser,
    secret: &str,
    ttl: Duration,
) -> Result<String, AppError> {
    let claims = SessionClaims::new(user, ttl);
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::Internal(anyhow!("create JWT: {e}")))
}

/// Verify and decode a session token.
/// Bad signatures, malformed and expired tokens are `Unauthorized`.
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionUser, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<SessionClaims>(token, &key, &Validation::default()).map_err(|e| {
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::Unauthorized,
            _ => AppError::Internal(anyhow!("JWT verification: {e}")),
        }
    })?;
    Ok(SessionUser::from(data.claims))
}

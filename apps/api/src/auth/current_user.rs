use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::debug;

use crate::auth::cookies::{read_cookie, SESSION_COOKIE};
use crate::auth::session::{verify_session_token, SessionUser};
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor for routes that require a logged-in user. Rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionUser);

/// Extractor for routes open to guests. `None` when there is no valid session.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

/// Reads and verifies the session cookie. Invalid or expired tokens count as absent.
fn session_user(parts: &Parts, state: &AppState) -> Option<SessionUser> {
    let token = read_cookie(&parts.headers, SESSION_COOKIE)?;
    match verify_session_token(token, &state.config.session_secret) {
        Ok(user) => Some(user),
        Err(e) => {
            debug!("Ignoring session cookie: {e}");
            None
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        session_user(parts, state)
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_user(parts, state)))
    }
}

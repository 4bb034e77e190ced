//! Axum route handlers for accounts, sessions and the stored API key.

use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::cookies::{clear_cookie, set_cookie, API_KEY_COOKIE, SESSION_COOKIE};
use crate::auth::current_user::CurrentUser;
use crate::auth::password::{hash_password_blocking, verify_password_blocking, MIN_PASSWORD_LEN};
use crate::auth::session::{create_session_token, SessionUser};
use crate::errors::AppError;
use crate::models::user::NewUser;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct SetApiKeyRequest {
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn session_cookie(user: &SessionUser, state: &AppState) -> Result<String, AppError> {
    let token = create_session_token(user, &state.config.session_secret, state.config.session_ttl)?;
    Ok(set_cookie(
        SESSION_COOKIE,
        &token,
        state.config.session_ttl,
        state.config.secure_cookies,
    ))
}

fn validate_signup(request: &SignupRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("email is not valid".to_string()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_signup(&request)?;

    let password_hash = hash_password_blocking(request.password).await?;
    let created = state
        .users
        .create(NewUser {
            name: request.name.trim().to_string(),
            email: request.email,
            password_hash,
        })
        .await?;

    let user = SessionUser::from(&created);
    let cookie = session_cookie(&user, &state)?;
    info!("Created account {}", user.id);

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse { user })))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password produce the same error.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = verify_password_blocking(request.password, stored.password_hash.clone()).await?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let user = SessionUser::from(&stored);
    let cookie = session_cookie(&user, &state)?;
    info!("User {} logged in", user.id);

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse { user })))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_cookie(SESSION_COOKIE, state.config.secure_cookies);
    ([(header::SET_COOKIE, cookie)], Json(SuccessResponse { success: true }))
}

/// GET /api/v1/auth/me
///
/// Re-reads the account so a token outliving its user is rejected.
pub async fn handle_me(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<AuthResponse>, AppError> {
    let stored = state
        .users
        .find_by_id(session.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(AuthResponse {
        user: SessionUser::from(&stored),
    }))
}

/// PUT /api/v1/auth/api-key
///
/// Stores the caller's LLM key in an encrypted HttpOnly cookie.
pub async fn handle_set_api_key(
    State(state): State<AppState>,
    Json(request): Json<SetApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("API key cannot be empty".to_string()));
    }

    let sealed = state.cookie_cipher.encrypt(api_key)?;
    let cookie = set_cookie(
        API_KEY_COOKIE,
        &sealed,
        state.config.api_key_ttl,
        state.config.secure_cookies,
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(SuccessResponse { success: true })))
}

/// DELETE /api/v1/auth/api-key
pub async fn handle_clear_api_key(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_cookie(API_KEY_COOKIE, state.config.secure_cookies);
    ([(header::SET_COOKIE, cookie)], Json(SuccessResponse { success: true }))
}

//! Axum route handlers for the Generation API.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::cookies::{clear_cookie, read_cookie, API_KEY_COOKIE};
use crate::auth::current_user::MaybeUser;
use crate::errors::AppError;
use crate::generation::generator::{
    generate_proposal, verify_api_key, GenerationFailure, GenerationMode, KeyVerification,
};
use crate::generation::template::{generate_cover_letter_text, ProposalRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateProposalBody {
    #[serde(flatten)]
    pub request: ProposalRequest,
    #[serde(default)]
    pub mode: GenerationMode,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyKeyRequest {
    #[serde(alias = "apiKey")]
    pub api_key: String,
}

/// Where the API key for a remote call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySource {
    Server,
    Cookie,
}

/// Resolved key plus a flag telling the caller to drop an unreadable cookie.
struct ResolvedKey {
    key: Option<(String, KeySource)>,
    clear_cookie: bool,
}

/// Server-configured key wins; otherwise the caller's sealed cookie.
fn resolve_api_key(state: &AppState, headers: &HeaderMap) -> ResolvedKey {
    if let Some(key) = &state.config.openai_api_key {
        return ResolvedKey {
            key: Some((key.clone(), KeySource::Server)),
            clear_cookie: false,
        };
    }

    match read_cookie(headers, API_KEY_COOKIE) {
        None => ResolvedKey {
            key: None,
            clear_cookie: false,
        },
        Some(sealed) => match state.cookie_cipher.decrypt(sealed) {
            Ok(key) => ResolvedKey {
                key: Some((key, KeySource::Cookie)),
                clear_cookie: false,
            },
            Err(e) => {
                warn!("Discarding unreadable API key cookie: {e}");
                ResolvedKey {
                    key: None,
                    clear_cookie: true,
                }
            }
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate/proposal
///
/// Open to guests. Nothing is persisted here; saving is a separate call.
pub async fn handle_generate_proposal(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    headers: HeaderMap,
    Json(body): Json<GenerateProposalBody>,
) -> Response {
    let resolved = resolve_api_key(&state, &headers);
    let key_source = resolved.key.as_ref().map(|(_, source)| *source);
    let api_key = resolved.key.as_ref().map(|(key, _)| key.as_str());

    info!(
        "Generating proposal for '{}' (mode={:?}, user={:?})",
        body.request.job_title,
        body.mode,
        user.as_ref().map(|u| u.id)
    );

    let result = generate_proposal(state.llm.as_ref(), api_key, &body.request, body.mode).await;

    // A rejected cookie key is dropped so the client can prompt for a new one.
    let clear = resolved.clear_cookie
        || (matches!(result, Err(GenerationFailure::ApiKeyInvalid))
            && key_source == Some(KeySource::Cookie));

    let response = match result {
        Ok(generated) => Json(generated).into_response(),
        Err(failure) => AppError::from(failure).into_response(),
    };

    if clear {
        let cookie = clear_cookie(API_KEY_COOKIE, state.config.secure_cookies);
        ([(header::SET_COOKIE, cookie)], response).into_response()
    } else {
        response
    }
}

/// POST /api/v1/generate/cover-letter
///
/// Template-only; regenerates a cover letter without touching the proposal.
pub async fn handle_generate_cover_letter(
    Json(request): Json<ProposalRequest>,
) -> Json<CoverLetterResponse> {
    Json(CoverLetterResponse {
        cover_letter: generate_cover_letter_text(&request),
    })
}

/// POST /api/v1/api-key/verify
pub async fn handle_verify_api_key(
    State(state): State<AppState>,
    Json(request): Json<VerifyKeyRequest>,
) -> Result<Json<KeyVerification>, AppError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("Invalid API key format".to_string()));
    }

    Ok(Json(verify_api_key(state.llm.as_ref(), api_key).await))
}

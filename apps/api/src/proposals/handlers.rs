//! Axum route handlers for the caller's saved proposals.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::current_user::CurrentUser;
use crate::errors::AppError;
use crate::generation::template::{generate_cover_letter_text, ProposalRequest};
use crate::models::proposal::{NewProposal, ProposalRow, ProposalUpdate};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveProposalRequest {
    #[serde(flatten)]
    pub request: ProposalRequest,
    pub proposal: String,
    /// Generated from the template when absent.
    #[serde(default, alias = "coverLetter")]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalRow>,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Proposal {id} not found"))
}

/// GET /api/v1/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProposalListResponse>, AppError> {
    let proposals = state.proposals.list_by_owner(user.id).await?;
    Ok(Json(ProposalListResponse { proposals }))
}

/// POST /api/v1/proposals
pub async fn handle_save_proposal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SaveProposalRequest>,
) -> Result<(StatusCode, Json<ProposalRow>), AppError> {
    if body.proposal.trim().is_empty() {
        return Err(AppError::Validation("proposal cannot be empty".to_string()));
    }

    let cover_letter = body
        .cover_letter
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| generate_cover_letter_text(&body.request));

    let saved = state
        .proposals
        .insert(NewProposal {
            user_id: user.id,
            request: body.request,
            proposal: body.proposal,
            cover_letter,
            is_favorite: false,
        })
        .await?;

    info!("Saved proposal {} for user {}", saved.id, user.id);
    Ok((StatusCode::CREATED, Json(saved)))
}

/// GET /api/v1/proposals/:id
pub async fn handle_get_proposal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalRow>, AppError> {
    state
        .proposals
        .get(id, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/v1/proposals/:id
pub async fn handle_update_proposal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(update): Json<ProposalUpdate>,
) -> Result<Json<ProposalRow>, AppError> {
    state
        .proposals
        .update(id, user.id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/v1/proposals/:id/favorite
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalRow>, AppError> {
    state
        .proposals
        .toggle_favorite(id, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/proposals/:id
pub async fn handle_delete_proposal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.proposals.delete(id, user.id).await? {
        info!("Deleted proposal {id} for user {}", user.id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

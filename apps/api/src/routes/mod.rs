pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::proposals::handlers as proposals;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts and sessions
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route(
            "/api/v1/auth/api-key",
            put(auth::handle_set_api_key).delete(auth::handle_clear_api_key),
        )
        .route(
            "/api/v1/api-key/verify",
            post(generation::handle_verify_api_key),
        )
        // Generation
        .route(
            "/api/v1/generate/proposal",
            post(generation::handle_generate_proposal),
        )
        .route(
            "/api/v1/generate/cover-letter",
            post(generation::handle_generate_cover_letter),
        )
        // Saved proposals
        .route(
            "/api/v1/proposals",
            get(proposals::handle_list_proposals).post(proposals::handle_save_proposal),
        )
        .route(
            "/api/v1/proposals/:id",
            get(proposals::handle_get_proposal)
                .put(proposals::handle_update_proposal)
                .delete(proposals::handle_delete_proposal),
        )
        .route(
            "/api/v1/proposals/:id/favorite",
            post(proposals::handle_toggle_favorite),
        )
        .with_state(state)
}

use std::sync::Arc;

use crate::auth::crypto::CookieCipher;
use crate::auth::store::UserStore;
use crate::config::Config;
use crate::llm_client::TextCompleter;
use crate::proposals::store::ProposalStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable user store. In-memory unless DATABASE_URL is set.
    pub users: Arc<dyn UserStore>,
    /// Pluggable proposal store, same backend selection as `users`.
    pub proposals: Arc<dyn ProposalStore>,
    /// Remote text generation. `LlmClient` in production, a stub in tests.
    pub llm: Arc<dyn TextCompleter>,
    /// Seals the API-key cookie.
    pub cookie_cipher: CookieCipher,
    pub config: Config,
}

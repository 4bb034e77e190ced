mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod proposals;
mod routes;
mod seed;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::crypto::CookieCipher;
use crate::auth::store::{InMemoryUserStore, PgUserStore, UserStore};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::proposals::store::{InMemoryProposalStore, PgProposalStore, ProposalStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting proposal-desk v{}", env!("CARGO_PKG_VERSION"));

    let (users, proposals): (Arc<dyn UserStore>, Arc<dyn ProposalStore>) =
        match &config.database_url {
            Some(url) => {
                let db = create_pool(url).await?;
                (
                    Arc::new(PgUserStore::new(db.clone())),
                    Arc::new(PgProposalStore::new(db)),
                )
            }
            None => {
                warn!("DATABASE_URL not set; accounts and proposals are kept in memory");
                (
                    Arc::new(InMemoryUserStore::new()),
                    Arc::new(InMemoryProposalStore::new()),
                )
            }
        };

    if config.seed_demo_data {
        seed::seed_demo_data(users.as_ref(), proposals.as_ref()).await?;
    }

    let llm = LlmClient::new(&config.openai_base_url, &config.openai_model, config.llm_timeout)?;
    info!(
        "LLM client initialized (model: {}, server key: {})",
        llm.model(),
        config.openai_api_key.is_some()
    );

    let state = AppState {
        users,
        proposals,
        llm: Arc::new(llm),
        cookie_cipher: CookieCipher::from_secret(&config.session_secret),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

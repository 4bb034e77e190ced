use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Clone)]
pub struct Config {
    /// Postgres connection string. Unset: proposals and users live in process memory.
    pub database_url: Option<String>,
    /// Server-wide LLM key. Takes precedence over a key stored in the caller's cookie.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout: Duration,
    /// Signs session tokens and derives the API-key cookie encryption key.
    pub session_secret: String,
    pub session_ttl: Duration,
    pub api_key_ttl: Duration,
    pub secure_cookies: bool,
    pub seed_demo_data: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let database_url = optional_env("DATABASE_URL");
        let session_ttl_days: u64 = parse_env("SESSION_TTL_DAYS", 7)?;
        let seed_default = database_url.is_none();

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 30)?),
            session_secret: require_env("SESSION_SECRET")?,
            session_ttl: Duration::from_secs(session_ttl_days * 24 * 60 * 60),
            api_key_ttl: Duration::from_secs(30 * 24 * 60 * 60),
            secure_cookies: parse_env("SECURE_COOKIES", false)?,
            seed_demo_data: parse_env("SEED_DEMO_DATA", seed_default)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            database_url,
        })
    }

    /// Defaults for tests: in-memory stores, no LLM key, insecure cookies.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            llm_timeout: Duration::from_secs(5),
            session_secret: "test-session-secret".to_string(),
            session_ttl: Duration::from_secs(3600),
            api_key_ttl: Duration::from_secs(3600),
            secure_cookies: false,
            seed_demo_data: false,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| REDACTED))
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| REDACTED))
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("llm_timeout", &self.llm_timeout)
            .field("session_secret", &REDACTED)
            .field("session_ttl", &self.session_ttl)
            .field("api_key_ttl", &self.api_key_ttl)
            .field("secure_cookies", &self.secure_cookies)
            .field("seed_demo_data", &self.seed_demo_data)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable's value, treating empty strings as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

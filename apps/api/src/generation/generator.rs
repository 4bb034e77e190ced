//! Proposal generation: remote LLM when possible, offline template otherwise.
//!
//! Flow: resolve mode → (remote) build prompt → TextCompleter → classify failure →
//!       fall back to the template where the failure is not the user's to fix.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::prompts::{
    PROPOSAL_MAX_TOKENS, PROPOSAL_PROMPT_TEMPLATE, PROPOSAL_SYSTEM, PROPOSAL_TEMPERATURE,
};
use crate::generation::template::{generate_proposal_text, ProposalRequest};
use crate::llm_client::prompts::{KEY_CHECK_MAX_TOKENS, KEY_CHECK_PROMPT};
use crate::llm_client::{CompletionOptions, LlmError, TextCompleter};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// How the caller wants the proposal produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Remote first; template fallback on quota, timeout and upstream failures.
    #[default]
    Auto,
    /// Remote only; every failure is returned.
    Remote,
    /// Template only; never touches the network.
    Offline,
}

/// Which generator produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    Remote,
    Offline,
}

/// Typed outcome of a failed remote generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("OpenAI API key is missing. Add a key or use offline mode.")]
    ApiKeyMissing,

    #[error("Invalid OpenAI API key. Update the key or use offline mode.")]
    ApiKeyInvalid,

    #[error("OpenAI API rate limit exceeded. Please try again later or use offline mode.")]
    RateLimited,

    #[error("OpenAI API key has exceeded its quota. Check your plan and billing details.")]
    QuotaExceeded,

    #[error("The request took too long to complete. Please try again or use shorter inputs.")]
    Timeout,

    #[error("Text generation failed: {0}")]
    Upstream(String),
}

impl GenerationFailure {
    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            GenerationFailure::ApiKeyMissing => "API_KEY_MISSING",
            GenerationFailure::ApiKeyInvalid => "API_KEY_INVALID",
            GenerationFailure::RateLimited => "API_KEY_RATE_LIMIT",
            GenerationFailure::QuotaExceeded => "API_KEY_QUOTA_EXCEEDED",
            GenerationFailure::Timeout => "GENERATION_TIMEOUT",
            GenerationFailure::Upstream(_) => "GENERATION_FAILED",
        }
    }

    /// Whether `Auto` mode substitutes the offline template for this failure.
    /// Key problems and rate limits are reported so the user can act on them.
    pub fn falls_back_to_offline(&self) -> bool {
        matches!(
            self,
            GenerationFailure::QuotaExceeded
                | GenerationFailure::Timeout
                | GenerationFailure::Upstream(_)
        )
    }
}

/// A failure surfaced alongside fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationNotice {
    pub code: &'static str,
    pub message: String,
}

impl From<&GenerationFailure> for GenerationNotice {
    fn from(failure: &GenerationFailure) -> Self {
        Self {
            code: failure.code(),
            message: failure.to_string(),
        }
    }
}

/// Proposal text plus how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProposal {
    pub proposal: String,
    pub source: GenerationSource,
    /// Set when the remote call failed and the template was used instead.
    pub notice: Option<GenerationNotice>,
}

/// Result of checking an API key against the remote service.
#[derive(Debug, Clone, Serialize)]
pub struct KeyVerification {
    pub success: bool,
    pub quota_exceeded: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

// ────────────────────────────────────────────────────────────────────────────
// Failure classification
// ────────────────────────────────────────────────────────────────────────────

/// Maps a client error to the user-facing failure taxonomy.
///
/// Order matters: quota messages arrive with status 429 and must not be
/// reported as rate limiting.
pub fn classify_llm_error(error: &LlmError) -> GenerationFailure {
    match error {
        LlmError::Timeout => GenerationFailure::Timeout,
        LlmError::Api { status, message } => {
            let lower = message.to_lowercase();
            if ["quota", "billing", "exceeded"]
                .iter()
                .any(|m| lower.contains(m))
            {
                GenerationFailure::QuotaExceeded
            } else if *status == 401
                || *status == 403
                || lower.contains("api key")
                || lower.contains("authentication")
            {
                GenerationFailure::ApiKeyInvalid
            } else if *status == 429 {
                GenerationFailure::RateLimited
            } else {
                GenerationFailure::Upstream(message.clone())
            }
        }
        other => GenerationFailure::Upstream(other.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Fills the proposal prompt template from the request fields.
pub fn build_proposal_prompt(request: &ProposalRequest) -> String {
    PROPOSAL_PROMPT_TEMPLATE
        .replace("{job_title}", &request.job_title)
        .replace("{job_description}", &request.job_description)
        .replace("{skills}", &request.skills)
        .replace("{experience}", &request.experience)
}

fn offline(request: &ProposalRequest, notice: Option<GenerationNotice>) -> GeneratedProposal {
    GeneratedProposal {
        proposal: generate_proposal_text(request),
        source: GenerationSource::Offline,
        notice,
    }
}

/// Produces a proposal according to `mode`.
///
/// `Offline` never fails. `Remote` returns every failure. `Auto` returns key and
/// rate-limit failures and falls back to the template for the rest.
pub async fn generate_proposal(
    completer: &dyn TextCompleter,
    api_key: Option<&str>,
    request: &ProposalRequest,
    mode: GenerationMode,
) -> Result<GeneratedProposal, GenerationFailure> {
    if mode == GenerationMode::Offline {
        return Ok(offline(request, None));
    }

    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        return Err(GenerationFailure::ApiKeyMissing);
    };

    let prompt = build_proposal_prompt(request);
    let options = CompletionOptions {
        temperature: Some(PROPOSAL_TEMPERATURE),
        max_tokens: PROPOSAL_MAX_TOKENS,
    };

    match completer
        .complete(api_key, Some(PROPOSAL_SYSTEM), &prompt, options)
        .await
    {
        Ok(text) => {
            info!("Generated remote proposal for '{}'", request.job_title);
            Ok(GeneratedProposal {
                proposal: text,
                source: GenerationSource::Remote,
                notice: None,
            })
        }
        Err(e) => {
            let failure = classify_llm_error(&e);
            warn!("Remote proposal generation failed: {e} ({})", failure.code());
            if mode == GenerationMode::Auto && failure.falls_back_to_offline() {
                Ok(offline(request, Some(GenerationNotice::from(&failure))))
            } else {
                Err(failure)
            }
        }
    }
}

/// Sends a minimal prompt to check that `api_key` is accepted.
/// A key that is valid but out of quota still counts as a success.
pub async fn verify_api_key(completer: &dyn TextCompleter, api_key: &str) -> KeyVerification {
    let options = CompletionOptions {
        temperature: None,
        max_tokens: KEY_CHECK_MAX_TOKENS,
    };

    match completer
        .complete(api_key, None, KEY_CHECK_PROMPT, options)
        .await
    {
        Ok(sample) => KeyVerification {
            success: true,
            quota_exceeded: false,
            message: "API key is valid".to_string(),
            sample: Some(sample),
            error_code: None,
        },
        Err(e) => {
            let failure = classify_llm_error(&e);
            warn!("API key verification failed: {e}");
            if failure == GenerationFailure::QuotaExceeded {
                KeyVerification {
                    success: true,
                    quota_exceeded: true,
                    message: "API key is valid but has exceeded its quota".to_string(),
                    sample: None,
                    error_code: Some(failure.code()),
                }
            } else {
                KeyVerification {
                    success: false,
                    quota_exceeded: false,
                    message: e.to_string(),
                    sample: None,
                    error_code: Some(failure.code()),
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Completer stub that replays a fixed outcome and counts calls.
    pub(crate) struct StubCompleter {
        outcome: Result<String, (u16, String)>,
        timeout: bool,
        pub calls: AtomicUsize,
    }

    impl StubCompleter {
        pub(crate) fn ok(text: &str) -> Self {
            Self {
                outcome: Ok(text.to_string()),
                timeout: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn api_error(status: u16, message: &str) -> Self {
            Self {
                outcome: Err((status, message.to_string())),
                timeout: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn timeout() -> Self {
            Self {
                outcome: Err((0, String::new())),
                timeout: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextCompleter for StubCompleter {
        async fn complete(
            &self,
            _api_key: &str,
            _system: Option<&str>,
            _prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.timeout {
                return Err(LlmError::Timeout);
            }
            self.outcome.clone().map_err(|(status, message)| LlmError::Api { status, message })
        }
    }

    fn request() -> ProposalRequest {
        ProposalRequest {
            job_title: "React Developer".to_string(),
            job_description: "We need React and TypeScript skills for a dashboard project"
                .to_string(),
            skills: "React, TypeScript, Next.js".to_string(),
            experience: "5 years building web apps".to_string(),
        }
    }

    fn api(status: u16, message: &str) -> LlmError {
        LlmError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classify_quota_before_rate_limit() {
        let e = api(
            429,
            "You exceeded your current quota, please check your plan and billing details.",
        );
        assert_eq!(classify_llm_error(&e), GenerationFailure::QuotaExceeded);
    }

    #[test]
    fn test_classify_rate_limit() {
        let e = api(429, "Rate limit reached for requests");
        assert_eq!(classify_llm_error(&e), GenerationFailure::RateLimited);
    }

    #[test]
    fn test_classify_invalid_key_by_status_and_message() {
        assert_eq!(
            classify_llm_error(&api(401, "Unauthorized")),
            GenerationFailure::ApiKeyInvalid
        );
        assert_eq!(
            classify_llm_error(&api(403, "Forbidden")),
            GenerationFailure::ApiKeyInvalid
        );
        assert_eq!(
            classify_llm_error(&api(400, "Incorrect API key provided: sk-abc")),
            GenerationFailure::ApiKeyInvalid
        );
    }

    #[test]
    fn test_classify_timeout_and_upstream() {
        assert_eq!(classify_llm_error(&LlmError::Timeout), GenerationFailure::Timeout);
        assert_eq!(
            classify_llm_error(&api(500, "server overloaded")),
            GenerationFailure::Upstream("server overloaded".to_string())
        );
        assert!(matches!(
            classify_llm_error(&LlmError::EmptyContent),
            GenerationFailure::Upstream(_)
        ));
    }

    #[test]
    fn test_failure_codes_match_client_contract() {
        assert_eq!(GenerationFailure::ApiKeyMissing.code(), "API_KEY_MISSING");
        assert_eq!(GenerationFailure::ApiKeyInvalid.code(), "API_KEY_INVALID");
        assert_eq!(GenerationFailure::RateLimited.code(), "API_KEY_RATE_LIMIT");
        assert_eq!(GenerationFailure::QuotaExceeded.code(), "API_KEY_QUOTA_EXCEEDED");
    }

    #[test]
    fn test_build_prompt_interpolates_every_field() {
        let prompt = build_proposal_prompt(&request());
        assert!(prompt.contains("Job Title: React Developer"));
        assert!(prompt.contains("React, TypeScript, Next.js"));
        assert!(prompt.contains("5 years building web apps"));
        assert!(!prompt.contains('{'));
    }

    #[tokio::test]
    async fn test_offline_mode_never_calls_remote() {
        let stub = StubCompleter::ok("remote text");
        let out = generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Offline)
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Offline);
        assert_eq!(out.proposal, generate_proposal_text(&request()));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_not_replaced() {
        let stub = StubCompleter::ok("remote text");
        let result = generate_proposal(&stub, None, &request(), GenerationMode::Auto).await;
        assert_eq!(result.unwrap_err(), GenerationFailure::ApiKeyMissing);

        let result = generate_proposal(&stub, Some("  "), &request(), GenerationMode::Auto).await;
        assert_eq!(result.unwrap_err(), GenerationFailure::ApiKeyMissing);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_success() {
        let stub = StubCompleter::ok("Dear Client, tailored text");
        let out = generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Auto)
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Remote);
        assert_eq!(out.proposal, "Dear Client, tailored text");
        assert!(out.notice.is_none());
    }

    #[tokio::test]
    async fn test_auto_falls_back_on_quota() {
        let stub = StubCompleter::api_error(429, "You exceeded your current quota");
        let out = generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Auto)
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Offline);
        assert_eq!(out.notice.unwrap().code, "API_KEY_QUOTA_EXCEEDED");
    }

    #[tokio::test]
    async fn test_auto_falls_back_on_timeout() {
        let stub = StubCompleter::timeout();
        let out = generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Auto)
            .await
            .unwrap();
        assert_eq!(out.source, GenerationSource::Offline);
        assert_eq!(out.notice.unwrap().code, "GENERATION_TIMEOUT");
    }

    #[tokio::test]
    async fn test_auto_reports_invalid_key_and_rate_limit() {
        let stub = StubCompleter::api_error(401, "Incorrect API key provided");
        let result = generate_proposal(&stub, Some("sk-bad"), &request(), GenerationMode::Auto).await;
        assert_eq!(result.unwrap_err(), GenerationFailure::ApiKeyInvalid);

        let stub = StubCompleter::api_error(429, "Rate limit reached");
        let result = generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Auto).await;
        assert_eq!(result.unwrap_err(), GenerationFailure::RateLimited);
    }

    #[tokio::test]
    async fn test_remote_mode_returns_quota_failure() {
        let stub = StubCompleter::api_error(429, "insufficient quota");
        let result =
            generate_proposal(&stub, Some("sk-test"), &request(), GenerationMode::Remote).await;
        assert_eq!(result.unwrap_err(), GenerationFailure::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_verify_key_outcomes() {
        let ok = verify_api_key(&StubCompleter::ok("Hi"), "sk-test").await;
        assert!(ok.success);
        assert_eq!(ok.sample.as_deref(), Some("Hi"));

        let quota =
            verify_api_key(&StubCompleter::api_error(429, "exceeded your quota"), "sk-test").await;
        assert!(quota.success);
        assert!(quota.quota_exceeded);

        let bad = verify_api_key(&StubCompleter::api_error(401, "Incorrect API key"), "sk-x").await;
        assert!(!bad.success);
        assert_eq!(bad.error_code, Some("API_KEY_INVALID"));
    }

    #[test]
    fn test_generation_mode_defaults_to_auto() {
        assert_eq!(GenerationMode::default(), GenerationMode::Auto);
        let mode: GenerationMode = serde_json::from_str(r#""offline""#).unwrap();
        assert_eq!(mode, GenerationMode::Offline);
    }
}

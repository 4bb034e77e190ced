use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::GenerationFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Generation(failure) => {
                let status = match failure {
                    GenerationFailure::ApiKeyMissing => StatusCode::BAD_REQUEST,
                    GenerationFailure::ApiKeyInvalid => StatusCode::UNAUTHORIZED,
                    GenerationFailure::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    GenerationFailure::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
                    GenerationFailure::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    GenerationFailure::Upstream(msg) => {
                        tracing::error!("Upstream generation error: {msg}");
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, failure.code(), failure.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failures_map_to_distinct_statuses() {
        let cases = [
            (GenerationFailure::ApiKeyMissing, StatusCode::BAD_REQUEST),
            (GenerationFailure::ApiKeyInvalid, StatusCode::UNAUTHORIZED),
            (GenerationFailure::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (GenerationFailure::QuotaExceeded, StatusCode::PAYMENT_REQUIRED),
            (GenerationFailure::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (
                GenerationFailure::Upstream("boom".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (failure, expected) in cases {
            let response = AppError::from(failure).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_internal_errors_are_masked() {
        let response = AppError::Internal(anyhow::anyhow!("secret detail")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_errors_keep_status() {
        assert_eq!(
            AppError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}

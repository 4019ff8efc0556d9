//! Application error type mapping to HTTP status codes and a JSON error body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use askgate_types::error::{AskError, GenerationError, UserError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Daily question quota exhausted.
    QuotaExceeded,
    /// Caller attempted an admin-only operation.
    NotAdmin,
    /// Malformed request input.
    Validation(String),
    /// The answer generator failed or timed out. The detail is logged,
    /// never returned to the caller.
    Upstream(String),
    /// Generic internal error. The detail is logged, never returned.
    Internal(String),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::InvalidEmail(msg) => AppError::Validation(msg),
            UserError::RecordVanished(_) | UserError::Repository(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<AskError> for AppError {
    fn from(e: AskError) -> Self {
        match e {
            AskError::InvalidQuestion(msg) => AppError::Validation(msg),
            AskError::QuotaExceeded => AppError::QuotaExceeded,
            AskError::User(inner) => inner.into(),
            AskError::Generation(inner) => match inner {
                GenerationError::Timeout => {
                    AppError::Upstream("answer generation timed out".to_string())
                }
                other => AppError::Upstream(other.to_string()),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::QuotaExceeded => (
                StatusCode::FORBIDDEN,
                "QUOTA_EXCEEDED",
                "You have reached your daily question limit. Please try again tomorrow."
                    .to_string(),
            ),
            AppError::NotAdmin => (
                StatusCode::FORBIDDEN,
                "NOT_ADMIN",
                "Only administrators can reset daily counts".to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Upstream(detail) => {
                tracing::error!(%detail, "answer generation failed");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "GENERATION_UNAVAILABLE",
                    "Answer generation is temporarily unavailable".to_string(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "code": code,
            "message": message,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::github::GitHubError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "A GitHub bearer token is required".to_string(),
            ),
            AppError::GitHub(e) => github_error_parts(e),
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

fn github_error_parts(e: &GitHubError) -> (StatusCode, &'static str, String) {
    match e {
        GitHubError::MissingCredential => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            e.to_string(),
        ),
        GitHubError::MissingUsername => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
        }
        GitHubError::NoRepositories(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
        GitHubError::Status { status: 401, .. } => (
            StatusCode::UNAUTHORIZED,
            "GITHUB_UNAUTHORIZED",
            "GitHub rejected the access token".to_string(),
        ),
        GitHubError::Status { .. } | GitHubError::Http(_) => {
            tracing::warn!("GitHub error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "GITHUB_ERROR",
                "GitHub request failed".to_string(),
            )
        }
        GitHubError::Timeout { .. } => {
            tracing::warn!("GitHub error: {e}");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "GITHUB_TIMEOUT",
                "GitHub did not respond in time".to_string(),
            )
        }
    }
}

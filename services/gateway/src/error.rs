use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledger::LedgerError;
use serde_json::json;
use thiserror::Error;

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A business rule said no. Reported as a normal response with
    /// `success: false`, not as an HTTP error.
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(err.user_message())
        } else if err.is_rejection() {
            AppError::Rejected(err.user_message())
        } else if err.is_invalid_input() {
            AppError::BadRequest(err.to_string())
        } else {
            AppError::InternalError(err.into())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::Rejected(message) => {
                return (
                    StatusCode::OK,
                    Json(json!({ "success": false, "message": message })),
                )
                    .into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::InternalError(err) => {
                tracing::error!(error = %format!("{err:#}"), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": code
        }));

        (status, body).into_response()
    }
}

//! Error types for linkgate-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use linkgate_billing::BillingError;
use linkgate_codes::CodeError;
use linkgate_email::EmailError;
use linkgate_store::StoreError;
use linkgate_verify::VerifyError;
use serde::Serialize;
use thiserror::Error;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields; rejected before any side effect
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found; never silently treated as success
    #[error("Not found: {0}")]
    NotFound(String),

    /// External identity provider rejected the access token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict (e.g., already exists)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upstream provider failure, surfaced with its own status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // The body carries the user-facing message without the Display
        // prefix; clients surface it verbatim.
        let (status, code, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "NOT_FOUND", m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, "CONFLICT", m),
            ApiError::Upstream { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "UPSTREAM_ERROR",
                message,
            ),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", m),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<EmailError> for ApiError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::MissingRecipient => {
                ApiError::BadRequest("No recipient email for reward delivery".to_string())
            }
            EmailError::NotConfigured(_) => {
                ApiError::Internal("Server configuration error".to_string())
            }
            EmailError::Rejected { .. } | EmailError::Transport(_) => {
                ApiError::Internal("Failed to send email".to_string())
            }
        }
    }
}

impl From<CodeError> for ApiError {
    fn from(err: CodeError) -> Self {
        match err {
            CodeError::Store(e) => e.into(),
            CodeError::Dispatch(e) => e.into(),
        }
    }
}

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::MissingConfig(field) => {
                ApiError::BadRequest(format!("Missing task configuration: {}", field))
            }
            VerifyError::Provider { status, message } => ApiError::Upstream { status, message },
            VerifyError::Transport(e) => ApiError::Upstream {
                status: 502,
                message: e.to_string(),
            },
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotConfigured(_) => {
                ApiError::Internal("Server configuration error".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

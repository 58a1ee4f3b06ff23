//! Error types for realcheck-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use realcheck_corpus::SamplingError;
use realcheck_engine::EngineError;
use realcheck_store::PersistenceError;
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

    /// Response store error
    #[error("Storage error: {0}")]
    Storage(#[from] PersistenceError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Confirm without a shown pair or without a choice
    #[error("No selection: choose one of the two conversations")]
    NoSelection,

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    /// The session has finished all rounds
    #[error("Session completed: {0}")]
    SessionCompleted(String),

    /// A general pool is empty
    #[error("Corpus unavailable: {0}")]
    EmptyCorpus(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// No admin password is configured
    #[error("Export disabled")]
    ExportDisabled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NoSelection => ApiError::NoSelection,
            EngineError::UnknownSession(user_id) => ApiError::UnknownSession(user_id.to_string()),
            EngineError::Sampling(SamplingError::EmptyCorpus(pool)) => {
                ApiError::EmptyCorpus(format!("the {pool} pool is empty"))
            }
            EngineError::Persistence(err) => ApiError::Persistence(err.to_string()),
            EngineError::InvalidPair(err) => ApiError::Internal(err.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NoSelection => (StatusCode::UNPROCESSABLE_ENTITY, "NO_SELECTION"),
            ApiError::UnknownSession(_) => (StatusCode::NOT_FOUND, "UNKNOWN_SESSION"),
            ApiError::SessionCompleted(_) => (StatusCode::CONFLICT, "SESSION_COMPLETED"),
            ApiError::EmptyCorpus(_) => (StatusCode::SERVICE_UNAVAILABLE, "EMPTY_CORPUS"),
            ApiError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::ExportDisabled => (StatusCode::FORBIDDEN, "EXPORT_DISABLED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

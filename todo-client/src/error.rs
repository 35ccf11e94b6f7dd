//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::reorder::ReorderError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No active todo (or label) with that id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Payload rejected by the server
    #[error("Validation error: {0}")]
    Validation(String),

    /// Gesture cannot be applied to the current lists
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Network or store unavailable; the operation may not have been applied
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Internal(_))
    }

    /// Server error code, when the server sent one
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotFound(_) => Some(ErrorCode::NotFound),
            Self::Validation(_) => Some(ErrorCode::ValidationFailed),
            Self::InvalidOperation(_) => Some(ErrorCode::InvalidOperation),
            Self::Internal(_) => Some(ErrorCode::InternalError),
            _ => None,
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::NotFound | ErrorCode::TodoNotFound | ErrorCode::LabelNotFound => {
                Self::NotFound(err.message)
            }
            ErrorCode::InvalidOperation | ErrorCode::TodoReorderOutOfBounds => {
                Self::InvalidOperation(err.message)
            }
            ErrorCode::Unknown
            | ErrorCode::InternalError
            | ErrorCode::DatabaseError
            | ErrorCode::NetworkError
            | ErrorCode::TimeoutError
            | ErrorCode::ConfigError => Self::Internal(err.message),
            _ => Self::Validation(err.message),
        }
    }
}

impl From<ReorderError> for ClientError {
    fn from(err: ReorderError) -> Self {
        Self::InvalidOperation(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

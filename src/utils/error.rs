//! Error types and handling
//!
//! Common error types used across the application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::SourceError;
use crate::recorder::RecordingError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Recording error: {0}")]
    Recording(#[from] RecordingError),

    #[error("Keypoint source error: {0}")]
    Source(#[from] SourceError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),
}

/// Error response for a UI layer
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let code = match &error {
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Recording(RecordingError::EmptyLabel) => "EMPTY_LABEL",
            AppError::Recording(RecordingError::SourceUnavailable(_)) => "SOURCE_UNAVAILABLE",
            AppError::Recording(RecordingError::Unsaved { .. }) => "RECORDING_NOT_SAVED",
            AppError::Recording(_) => "RECORDING_ERROR",
            AppError::Source(_) => "SOURCE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Task(_) => "TASK_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single call to the task API.
///
/// Non-2xx statuses and transport failures share this one kind; only the
/// message differs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RequestError {
    pub message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Builds the error for a non-success response, e.g.
    /// `Failed to create task: Bad Request`.
    pub fn from_status(action: &str, status: StatusCode) -> Self {
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string());
        Self::new(format!("Failed to {}: {}", action, reason))
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError::new(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::task::task_dto::first_message(&err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

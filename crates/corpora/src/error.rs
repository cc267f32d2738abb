//! Error types for corpus operations.

use thiserror::Error;

/// Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorporaError>;

/// Errors that can occur while orchestrating the corpus.
#[derive(Debug, Error)]
pub enum CorporaError {
    /// Missing or invalid required configuration. Fatal at construction,
    /// never retried.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-level failure reaching a provider.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status from a provider.
    #[error("Provider error: {status} - {message}")]
    Provider { status: u16, message: String },

    /// A provider returned a syntactically valid but empty response where
    /// a value was required.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Input validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CorporaError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a provider error.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Create an empty-result error.
    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::EmptyResult(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error is retryable by the caller.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

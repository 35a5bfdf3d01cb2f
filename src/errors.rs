//! Error types for tutorbuddy
//!
//! Each boundary (validation, dispatch, persistence, configuration) has its
//! own variant so callers can surface them distinctly.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tutor
#[derive(Error, Debug)]
pub enum TutorError {
    /// Missing credential or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required user input was empty
    #[error("Please enter a {field}.")]
    Validation { field: &'static str },

    /// Remote completion call failed
    #[error("Request failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// Progress file could not be read, parsed or written
    #[error("Progress file {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },
}

/// Failures of the chat-completion call
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not a valid completion response
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Response carried no usable text
    #[error("The API returned an empty response")]
    EmptyResponse,
}

impl TutorError {
    /// Build a persistence error for `path`
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TutorError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error should be shown as a warning rather than an error
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            TutorError::Validation { .. } | TutorError::Persistence { .. }
        )
    }
}

/// Result type alias for tutor operations
pub type Result<T> = std::result::Result<T, TutorError>;

//! Client-side validation failures.
//!
//! A validation error is raised before any request is built, so it never has
//! network side effects.

use thiserror::Error;

/// Input rejected by the client before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Question was empty after trimming.
    #[error("Question must not be empty")]
    EmptyQuestion,

    /// Batch upload requires at least two files.
    #[error("Batch upload needs at least 2 files (got {count}); use Upload for a single file")]
    BatchTooSmall { count: usize },

    /// Upload called without any file.
    #[error("Select at least one file to upload")]
    NoFiles,

    /// A streaming query is already running on this client.
    #[error("A streaming answer is already in progress")]
    StreamInProgress,

    /// A file chosen for upload could not be opened.
    #[error("Cannot read '{path}': {message}")]
    FileUnreadable { path: String, message: String },

    /// An action needs a selected row and none is selected.
    #[error("Select a {what} first")]
    NothingSelected { what: String },
}

impl ValidationError {
    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyQuestion => "E_VAL_QUESTION",
            ValidationError::BatchTooSmall { .. } => "E_VAL_BATCH",
            ValidationError::NoFiles => "E_VAL_NO_FILES",
            ValidationError::StreamInProgress => "E_VAL_BUSY",
            ValidationError::FileUnreadable { .. } => "E_VAL_FILE",
            ValidationError::NothingSelected { .. } => "E_VAL_SELECTION",
        }
    }
}

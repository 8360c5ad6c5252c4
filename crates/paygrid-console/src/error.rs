//! Error types for console behaviors.

use std::io;

/// Errors raised by storage, clipboard, reveal, upload and job operations.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Reading or writing a storage backend failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A stored or submitted value is not valid JSON for its type.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to the clipboard failed.
    #[error("Failed to write clipboard: {0}")]
    ClipboardFailed(String),

    /// A field failed validation.
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A file was refused before upload.
    #[error("File '{name}' rejected: {reason}")]
    FileRejected { name: String, reason: String },

    /// No tracked entry with this id.
    #[error("Unknown entry '{0}'")]
    NotFound(String),

    /// The entry is not in a state that allows this action.
    #[error("Cannot {action} '{id}' while {state}")]
    InvalidState {
        id: String,
        action: &'static str,
        state: &'static str,
    },

    /// The same job is already running.
    #[error("Job '{0}' is already in progress")]
    JobInFlight(String),

    /// A job attempt failed. Retry is manual.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// Reveal is not allowed for this value.
    #[error("Reveal is not available")]
    RevealDisabled,

    /// Copy is not allowed for this value.
    #[error("Copy is not available")]
    CopyDisabled,
}

impl ConsoleError {
    /// Create a validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a file rejection.
    pub fn rejected(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileRejected {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(id: impl ToString) -> Self {
        Self::NotFound(id.to_string())
    }
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_names_field() {
        let err = ConsoleError::validation("name", "required");
        assert_eq!(err.to_string(), "Invalid name: required");
    }

    #[test]
    fn invalid_state_message() {
        let err = ConsoleError::InvalidState {
            id: "7".into(),
            action: "retry",
            state: "uploading",
        };
        assert_eq!(err.to_string(), "Cannot retry '7' while uploading");
    }
}

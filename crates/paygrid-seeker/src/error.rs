//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while building queries.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A page was requested with a page size of zero.
    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;

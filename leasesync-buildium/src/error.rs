//! Buildium client error types.

use thiserror::Error;

/// Result type for Buildium operations.
pub type BuildiumResult<T> = Result<T, BuildiumError>;

/// Errors that can occur talking to Buildium.
#[derive(Debug, Error)]
pub enum BuildiumError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("Buildium returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl BuildiumError {
    /// True for failures caused by rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, BuildiumError::AuthFailed(_))
    }

    /// True when the response body did not have the expected shape.
    pub fn is_malformed(&self) -> bool {
        match self {
            BuildiumError::Malformed(_) => true,
            BuildiumError::Http(e) => e.is_decode(),
            _ => false,
        }
    }
}

//! Sheets client error types.

use thiserror::Error;

/// Result type for Sheets operations.
pub type SheetsResult<T> = Result<T, SheetsError>;

/// Errors that can occur reading or writing the spreadsheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("could not load service account credentials: {0}")]
    Credentials(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SheetsError {
    pub fn is_auth(&self) -> bool {
        matches!(self, SheetsError::Credentials(_) | SheetsError::Auth(_))
    }

    /// True for 4xx responses other than auth failures.
    pub fn is_client_rejection(&self) -> bool {
        matches!(self, SheetsError::Api { status, .. } if (400..500).contains(status))
    }

    pub fn is_malformed(&self) -> bool {
        match self {
            SheetsError::Malformed(_) | SheetsError::Serialization(_) => true,
            SheetsError::Http(e) => e.is_decode(),
            _ => false,
        }
    }
}

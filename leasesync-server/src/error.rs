//! Sync error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leasesync_buildium::BuildiumError;
use leasesync_sheets::SheetsError;
use serde::Serialize;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// A failed sync, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("fetching leases failed: {0}")]
    Fetch(#[source] BuildiumError),

    #[error("reading sheet failed: {0}")]
    ReadSheet(#[source] SheetsError),

    #[error("writing sheet failed: {0}")]
    WriteSheet(#[source] SheetsError),
}

/// Coarse classification used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Credentials for either API were rejected or could not be loaded.
    UpstreamAuth,
    /// Network failure or server-side error from either API.
    UpstreamUnavailable,
    /// A response did not have the expected shape.
    MalformedResponse,
    /// The Sheets API refused a write.
    WriteRejected,
}

impl SyncError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SyncError::Fetch(e) if e.is_auth() => FailureKind::UpstreamAuth,
            SyncError::Fetch(e) if e.is_malformed() => FailureKind::MalformedResponse,
            SyncError::Fetch(_) => FailureKind::UpstreamUnavailable,
            SyncError::ReadSheet(e) | SyncError::WriteSheet(e) if e.is_auth() => {
                FailureKind::UpstreamAuth
            }
            SyncError::ReadSheet(e) | SyncError::WriteSheet(e) if e.is_malformed() => {
                FailureKind::MalformedResponse
            }
            SyncError::WriteSheet(e) if e.is_client_rejection() => FailureKind::WriteRejected,
            SyncError::ReadSheet(_) | SyncError::WriteSheet(_) => FailureKind::UpstreamUnavailable,
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Sync failed: {self}"),
        )
            .into_response()
    }
}

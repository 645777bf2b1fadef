//! HTTP trigger service for leasesync.
//!
//! `GET /` runs one Buildium → Google Sheets sync; `GET /health` reports
//! liveness. Configuration is read once at startup into [`ServerConfig`].

pub mod config;
pub mod error;
pub mod routes;
pub mod sync;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{FailureKind, SyncError, SyncResult};
pub use routes::{AppState, router};
pub use sync::{LeaseSource, SheetStore, SyncReport, SyncService};

use anyhow::Context;
use leasesync_buildium::BuildiumClient;
use leasesync_sheets::{ServiceAccountTokens, SheetsClient};
use std::sync::Arc;

/// Builds the clients described by `config` and returns the router.
pub async fn build_app(config: &ServerConfig) -> anyhow::Result<axum::Router> {
    let buildium = BuildiumClient::new(config.buildium()).context("building Buildium client")?;

    let tokens = ServiceAccountTokens::from_file(&config.credentials_path)
        .await
        .context("loading Google service account")?;
    let sheets =
        SheetsClient::new(config.sheets(), Arc::new(tokens)).context("building Sheets client")?;

    let sync = SyncService::new(Arc::new(buildium), Arc::new(sheets));
    Ok(router(AppState {
        sync: Arc::new(sync),
    }))
}

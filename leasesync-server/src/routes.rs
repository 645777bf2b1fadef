//! HTTP routes: the sync trigger and a liveness check.

use crate::error::SyncResult;
use crate::sync::SyncService;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

/// State that's passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(run_sync))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn run_sync(State(state): State<AppState>) -> SyncResult<String> {
    match state.sync.run().await {
        Ok(report) => Ok(report.message()),
        Err(e) => {
            error!(kind = ?e.kind(), "sync failed: {e}");
            Err(e)
        }
    }
}

//! Sync orchestration.
//!
//! One run fetches outstanding balances, reads the sheet, reconciles, looks up
//! details for new leases, and applies every write in one batch. It owns all
//! I/O; the reconciler in `leasesync-types` is pure.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use leasesync_buildium::BuildiumClient;
use leasesync_sheets::SheetsClient;
use leasesync_types::{
    LeaseDetails, LeaseRecord, ReconcileSummary, SheetSnapshot, WriteOp, prune_unchanged,
    reconcile,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where lease balances come from.
#[async_trait]
pub trait LeaseSource: Send + Sync {
    async fn outstanding_balances(&self) -> SyncResult<Vec<LeaseRecord>>;

    async fn lease_details(&self, lease_id: &str) -> SyncResult<LeaseDetails>;
}

/// Where lease balances are written.
#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn snapshot(&self) -> SyncResult<SheetSnapshot>;

    async fn apply(
        &self,
        ops: &[WriteOp],
        details: &HashMap<String, LeaseDetails>,
    ) -> SyncResult<()>;
}

#[async_trait]
impl LeaseSource for BuildiumClient {
    async fn outstanding_balances(&self) -> SyncResult<Vec<LeaseRecord>> {
        BuildiumClient::outstanding_balances(self)
            .await
            .map_err(SyncError::Fetch)
    }

    async fn lease_details(&self, lease_id: &str) -> SyncResult<LeaseDetails> {
        BuildiumClient::lease_details(self, lease_id)
            .await
            .map_err(SyncError::Fetch)
    }
}

#[async_trait]
impl SheetStore for SheetsClient {
    async fn snapshot(&self) -> SyncResult<SheetSnapshot> {
        SheetsClient::snapshot(self).await.map_err(SyncError::ReadSheet)
    }

    async fn apply(
        &self,
        ops: &[WriteOp],
        details: &HashMap<String, LeaseDetails>,
    ) -> SyncResult<()> {
        SheetsClient::apply(self, ops, details)
            .await
            .map_err(SyncError::WriteSheet)
    }
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub summary: ReconcileSummary,
    /// Lease ids found on more than one sheet row.
    pub duplicate_keys: Vec<String>,
    /// New leases appended without tenant/address details.
    pub detail_failures: usize,
}

impl SyncReport {
    pub fn message(&self) -> String {
        format!(
            "Synced {} updates, added {} new rows ({} unchanged).",
            self.summary.updated, self.summary.appended, self.summary.unchanged
        )
    }
}

/// Runs the fetch → reconcile → write pipeline.
pub struct SyncService {
    leases: Arc<dyn LeaseSource>,
    sheet: Arc<dyn SheetStore>,
}

impl SyncService {
    pub fn new(leases: Arc<dyn LeaseSource>, sheet: Arc<dyn SheetStore>) -> Self {
        Self { leases, sheet }
    }

    /// Runs one sync to completion.
    ///
    /// Nothing is rolled back on failure: a failed write leaves the sheet as
    /// the Sheets API left it.
    pub async fn run(&self) -> SyncResult<SyncReport> {
        let records = self.leases.outstanding_balances().await?;
        debug!("fetched {} outstanding balances", records.len());

        let snapshot = self.sheet.snapshot().await?;
        let duplicate_keys = snapshot.index.duplicates().to_vec();
        for lease_id in &duplicate_keys {
            warn!("lease {lease_id} appears on more than one row; using the last one");
        }

        let ops = reconcile(&records, &snapshot.index, snapshot.next_append_row);
        let ops = prune_unchanged(ops, &snapshot.balances);
        let summary = ReconcileSummary::from_ops(&ops, records.len());

        let mut details = HashMap::new();
        let mut detail_failures = 0;
        for op in &ops {
            let WriteOp::Append { lease_id, .. } = op else { continue };
            match self.leases.lease_details(lease_id).await {
                Ok(d) => {
                    details.insert(lease_id.clone(), d);
                }
                Err(e) => {
                    warn!("appending lease {lease_id} without details: {e}");
                    detail_failures += 1;
                }
            }
        }

        self.sheet.apply(&ops, &details).await?;

        info!(
            updated = summary.updated,
            appended = summary.appended,
            unchanged = summary.unchanged,
            "sync complete"
        );

        Ok(SyncReport {
            summary,
            duplicate_keys,
            detail_failures,
        })
    }
}

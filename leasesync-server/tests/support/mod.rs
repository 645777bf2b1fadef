//! In-memory stand-ins for the Buildium and Sheets clients.

#![allow(dead_code)]

use async_trait::async_trait;
use leasesync_buildium::BuildiumError;
use leasesync_server::{LeaseSource, SheetStore, SyncError, SyncResult};
use leasesync_sheets::SheetsError;
use leasesync_types::{Decimal, LeaseDetails, LeaseRecord, SheetIndex, SheetSnapshot, WriteOp};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn rec(id: &str, cents: i64) -> LeaseRecord {
    LeaseRecord::new(id, Decimal::new(cents, 2))
}

#[derive(Default)]
pub struct FakeLeases {
    pub records: Vec<LeaseRecord>,
    pub details: HashMap<String, LeaseDetails>,
    pub fetch_error: Option<fn() -> BuildiumError>,
    pub detail_lookups: AtomicUsize,
}

impl FakeLeases {
    pub fn with(records: Vec<LeaseRecord>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }
}

#[async_trait]
impl LeaseSource for FakeLeases {
    async fn outstanding_balances(&self) -> SyncResult<Vec<LeaseRecord>> {
        match self.fetch_error {
            Some(make) => Err(SyncError::Fetch(make())),
            None => Ok(self.records.clone()),
        }
    }

    async fn lease_details(&self, lease_id: &str) -> SyncResult<LeaseDetails> {
        self.detail_lookups.fetch_add(1, Ordering::SeqCst);
        self.details.get(lease_id).cloned().ok_or_else(|| {
            SyncError::Fetch(BuildiumError::Api {
                status: 404,
                body: format!("lease {lease_id} not found"),
            })
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub lease_id: Option<String>,
    pub balance: Option<Decimal>,
    pub tenant_name: Option<String>,
}

/// A sheet holding only the cells leasesync reads and writes.
pub struct MemorySheet {
    pub start_row: u32,
    pub rows: Mutex<BTreeMap<u32, Row>>,
    pub read_error: Option<fn() -> SheetsError>,
    pub write_error: Option<fn() -> SheetsError>,
    pub apply_calls: AtomicUsize,
}

impl MemorySheet {
    pub fn new(start_row: u32) -> Self {
        Self {
            start_row,
            rows: Mutex::new(BTreeMap::new()),
            read_error: None,
            write_error: None,
            apply_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_rows(start_row: u32, rows: &[(&str, i64)]) -> Self {
        let sheet = Self::new(start_row);
        {
            let mut map = sheet.rows.lock().unwrap();
            for (offset, (id, cents)) in rows.iter().enumerate() {
                map.insert(
                    start_row + offset as u32,
                    Row {
                        lease_id: Some(id.to_string()),
                        balance: Some(Decimal::new(*cents, 2)),
                        tenant_name: None,
                    },
                );
            }
        }
        sheet
    }

    pub fn row(&self, row_number: u32) -> Option<Row> {
        self.rows.lock().unwrap().get(&row_number).cloned()
    }

    /// Balance per lease id, read back the way a person would read the sheet.
    pub fn balances_by_lease(&self) -> HashMap<String, Vec<Decimal>> {
        let mut out: HashMap<String, Vec<Decimal>> = HashMap::new();
        for row in self.rows.lock().unwrap().values() {
            if let (Some(id), Some(balance)) = (&row.lease_id, row.balance) {
                out.entry(id.clone()).or_default().push(balance);
            }
        }
        out
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn snapshot(&self) -> SyncResult<SheetSnapshot> {
        if let Some(make) = self.read_error {
            return Err(SyncError::ReadSheet(make()));
        }

        let rows = self.rows.lock().unwrap();
        let last = rows.keys().next_back().copied();
        let Some(last) = last else {
            return Ok(SheetSnapshot::empty(self.start_row));
        };

        let keys = (self.start_row..=last)
            .map(|n| rows.get(&n).and_then(|r| r.lease_id.clone()));
        let index = SheetIndex::scan(self.start_row, keys);
        let balances = rows
            .iter()
            .filter_map(|(n, r)| r.balance.map(|b| (*n, b)))
            .collect();

        Ok(SheetSnapshot {
            index,
            balances,
            next_append_row: last + 1,
        })
    }

    async fn apply(
        &self,
        ops: &[WriteOp],
        details: &HashMap<String, LeaseDetails>,
    ) -> SyncResult<()> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(make) = self.write_error {
            return Err(SyncError::WriteSheet(make()));
        }

        let mut rows = self.rows.lock().unwrap();
        for op in ops {
            match op {
                WriteOp::Update {
                    row_number,
                    balance,
                } => {
                    rows.entry(*row_number).or_default().balance = Some(*balance);
                }
                WriteOp::Append {
                    row_number,
                    lease_id,
                    balance,
                } => {
                    let row = rows.entry(*row_number).or_default();
                    row.lease_id = Some(lease_id.clone());
                    row.balance = Some(*balance);
                    row.tenant_name = details.get(lease_id).map(|d| d.tenant_name.clone());
                }
            }
        }
        Ok(())
    }
}

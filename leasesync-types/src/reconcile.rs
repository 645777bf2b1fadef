//! Upsert-by-lease-id reconciliation.
//!
//! `reconcile` turns a batch of fetched leases into the ordered row writes
//! that make the sheet reflect them. It is a pure function: the caller reads
//! the sheet, passes in the index, and applies the result.

use crate::index::SheetIndex;
use crate::lease::LeaseRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row mutation to apply to the sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteOp {
    /// Overwrite the balance cell of an existing row.
    Update { row_number: u32, balance: Decimal },
    /// Write a new row for a lease not yet on the sheet.
    Append {
        row_number: u32,
        lease_id: String,
        balance: Decimal,
    },
}

impl WriteOp {
    pub fn row_number(&self) -> u32 {
        match self {
            WriteOp::Update { row_number, .. } | WriteOp::Append { row_number, .. } => *row_number,
        }
    }

    pub fn balance(&self) -> Decimal {
        match self {
            WriteOp::Update { balance, .. } | WriteOp::Append { balance, .. } => *balance,
        }
    }

    pub fn is_append(&self) -> bool {
        matches!(self, WriteOp::Append { .. })
    }
}

/// Computes the writes for `records` against the current sheet index.
///
/// Appended leases get sequential rows starting at `next_append_row`. An
/// append reserves its row for the rest of the pass, so a lease id repeated
/// within the batch turns into an update of that row rather than a second
/// append.
pub fn reconcile(
    records: &[LeaseRecord],
    existing_index: &SheetIndex,
    next_append_row: u32,
) -> Vec<WriteOp> {
    let mut reserved: HashMap<&str, u32> = HashMap::new();
    let mut next_row = next_append_row;
    let mut ops = Vec::with_capacity(records.len());

    for record in records {
        let lease_id = record.lease_id.as_str();
        let balance = record.outstanding_balance;

        let existing = existing_index
            .get(lease_id)
            .or_else(|| reserved.get(lease_id).copied());

        match existing {
            Some(row_number) => ops.push(WriteOp::Update {
                row_number,
                balance,
            }),
            None => {
                reserved.insert(lease_id, next_row);
                ops.push(WriteOp::Append {
                    row_number: next_row,
                    lease_id: record.lease_id.clone(),
                    balance,
                });
                next_row += 1;
            }
        }
    }

    ops
}

/// Drops updates that would rewrite a balance the row already holds.
///
/// The value of each row is tracked through the op list, so an update that
/// restores a value changed earlier in the same batch is kept. Appends are
/// always kept.
pub fn prune_unchanged(ops: Vec<WriteOp>, current_balances: &HashMap<u32, Decimal>) -> Vec<WriteOp> {
    let mut current = current_balances.clone();
    let mut kept = Vec::with_capacity(ops.len());

    for op in ops {
        let row = op.row_number();
        let balance = op.balance();
        if !op.is_append() && current.get(&row) == Some(&balance) {
            continue;
        }
        current.insert(row, balance);
        kept.push(op);
    }

    kept
}

/// Counts reported back to the caller after a sync.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub updated: usize,
    pub appended: usize,
    pub unchanged: usize,
}

impl ReconcileSummary {
    /// Summarizes `ops`, counting records that produced no write as unchanged.
    pub fn from_ops(ops: &[WriteOp], record_count: usize) -> Self {
        let appended = ops.iter().filter(|op| op.is_append()).count();
        let updated = ops.len() - appended;
        Self {
            updated,
            appended,
            unchanged: record_count.saturating_sub(ops.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn update_when_present() {
        let mut index = SheetIndex::new();
        index.insert("L1".into(), 5);
        let ops = reconcile(&[LeaseRecord::new("L1", dec("100.00"))], &index, 20);
        assert_eq!(
            ops,
            vec![WriteOp::Update {
                row_number: 5,
                balance: dec("100.00")
            }]
        );
    }

    #[test]
    fn append_when_absent() {
        let ops = reconcile(&[LeaseRecord::new("L2", dec("50.00"))], &SheetIndex::new(), 10);
        assert_eq!(
            ops,
            vec![WriteOp::Append {
                row_number: 10,
                lease_id: "L2".into(),
                balance: dec("50.00")
            }]
        );
    }

    #[test]
    fn repeated_new_lease_updates_reserved_row() {
        let records = [
            LeaseRecord::new("L1", dec("10")),
            LeaseRecord::new("L1", dec("20")),
        ];
        let ops = reconcile(&records, &SheetIndex::new(), 7);
        assert_eq!(
            ops,
            vec![
                WriteOp::Append {
                    row_number: 7,
                    lease_id: "L1".into(),
                    balance: dec("10")
                },
                WriteOp::Update {
                    row_number: 7,
                    balance: dec("20")
                },
            ]
        );
    }

    #[test]
    fn empty_records_produce_no_ops() {
        assert!(reconcile(&[], &SheetIndex::new(), 2).is_empty());
    }

    #[test]
    fn prune_drops_matching_updates() {
        let ops = vec![
            WriteOp::Update {
                row_number: 3,
                balance: dec("10.00"),
            },
            WriteOp::Update {
                row_number: 4,
                balance: dec("11"),
            },
        ];
        let current = HashMap::from([(3, dec("10")), (4, dec("12"))]);
        let kept = prune_unchanged(ops, &current);
        assert_eq!(
            kept,
            vec![WriteOp::Update {
                row_number: 4,
                balance: dec("11")
            }]
        );
    }

    #[test]
    fn prune_keeps_update_that_restores_value() {
        let ops = vec![
            WriteOp::Update {
                row_number: 3,
                balance: dec("20"),
            },
            WriteOp::Update {
                row_number: 3,
                balance: dec("10"),
            },
        ];
        let current = HashMap::from([(3, dec("10"))]);
        assert_eq!(prune_unchanged(ops.clone(), &current), ops);
    }

    #[test]
    fn summary_counts() {
        let ops = vec![
            WriteOp::Update {
                row_number: 3,
                balance: Decimal::ONE,
            },
            WriteOp::Append {
                row_number: 9,
                lease_id: "N".into(),
                balance: Decimal::ONE,
            },
        ];
        let summary = ReconcileSummary::from_ops(&ops, 4);
        assert_eq!(
            summary,
            ReconcileSummary {
                updated: 1,
                appended: 1,
                unchanged: 2
            }
        );
    }
}

//! Lease-id → row lookup built by scanning the sheet.

use crate::reconcile::WriteOp;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Maps lease ids to 1-based sheet row numbers.
///
/// Built fresh each run. When a lease id occurs on more than one row the
/// last row scanned wins; the id is remembered in [`SheetIndex::duplicates`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetIndex {
    rows: HashMap<String, u32>,
    duplicates: Vec<String>,
}

impl SheetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a column top to bottom, where the first cell sits on `start_row`.
    ///
    /// Cells are trimmed and blank cells are skipped.
    pub fn scan<I, S>(start_row: u32, cells: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (offset, cell) in cells.into_iter().enumerate() {
            let Some(cell) = cell else { continue };
            let key = cell.as_ref().trim();
            if key.is_empty() {
                continue;
            }
            index.insert(key.to_string(), start_row + offset as u32);
        }
        index
    }

    /// Inserts a key, recording it as a duplicate if it was already present.
    pub fn insert(&mut self, lease_id: String, row_number: u32) {
        if self.rows.insert(lease_id.clone(), row_number).is_some()
            && !self.duplicates.contains(&lease_id)
        {
            self.duplicates.push(lease_id);
        }
    }

    pub fn get(&self, lease_id: &str) -> Option<u32> {
        self.rows.get(lease_id).copied()
    }

    pub fn contains(&self, lease_id: &str) -> bool {
        self.rows.contains_key(lease_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Lease ids that appeared on more than one row, in first-seen order.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Folds the appends of a reconcile pass into the index.
    pub fn record_ops(&mut self, ops: &[WriteOp]) {
        for op in ops {
            if let WriteOp::Append {
                row_number,
                lease_id,
                ..
            } = op
            {
                self.rows.insert(lease_id.clone(), *row_number);
            }
        }
    }
}

/// The designated columns of the sheet as read at the start of a sync.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetSnapshot {
    pub index: SheetIndex,
    /// Current balance cell per row, for rows whose cell parsed as a number.
    pub balances: HashMap<u32, Decimal>,
    /// One past the last occupied row in either designated column.
    pub next_append_row: u32,
}

impl SheetSnapshot {
    /// An empty sheet whose data would begin at `start_row`.
    pub fn empty(start_row: u32) -> Self {
        Self {
            next_append_row: start_row,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_assigns_rows_from_start() {
        let index = SheetIndex::scan(3, vec![Some("101"), Some("102"), Some("103")]);
        assert_eq!(index.get("101"), Some(3));
        assert_eq!(index.get("103"), Some(5));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn scan_skips_blank_cells_but_keeps_offsets() {
        let index = SheetIndex::scan(2, vec![Some("A"), None, Some("  "), Some("B")]);
        assert_eq!(index.get("A"), Some(2));
        assert_eq!(index.get("B"), Some(5));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn scan_trims_keys() {
        let index = SheetIndex::scan(2, vec![Some(" 77 ")]);
        assert_eq!(index.get("77"), Some(2));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let index = SheetIndex::scan(2, vec![Some("X"), Some("Y"), Some("X"), Some("X")]);
        assert_eq!(index.get("X"), Some(5));
        assert_eq!(index.duplicates(), &["X".to_string()]);
    }

    #[test]
    fn record_ops_only_adds_appends() {
        let mut index = SheetIndex::new();
        index.insert("L1".into(), 4);
        index.record_ops(&[
            WriteOp::Update {
                row_number: 4,
                balance: Decimal::ONE,
            },
            WriteOp::Append {
                row_number: 9,
                lease_id: "L2".into(),
                balance: Decimal::ONE,
            },
        ]);
        assert_eq!(index.get("L1"), Some(4));
        assert_eq!(index.get("L2"), Some(9));
        assert!(index.duplicates().is_empty());
    }

    #[test]
    fn empty_snapshot_appends_at_start() {
        let snap = SheetSnapshot::empty(2);
        assert_eq!(snap.next_append_row, 2);
        assert!(snap.index.is_empty());
    }
}

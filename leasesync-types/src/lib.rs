//! Core types for leasesync.
//!
//! Holds the lease and sheet data model plus the upsert reconciler that
//! decides, for each fetched lease, whether its spreadsheet row is
//! overwritten or a new row is appended. Nothing in this crate performs I/O.

pub mod column;
pub mod error;
pub mod index;
pub mod lease;
pub mod reconcile;

pub use column::Column;
pub use error::{TypesError, TypesResult};
pub use index::{SheetIndex, SheetSnapshot};
pub use lease::{LeaseDetails, LeaseRecord};
pub use reconcile::{ReconcileSummary, WriteOp, prune_unchanged, reconcile};

pub use rust_decimal::Decimal;

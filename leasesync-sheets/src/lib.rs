//! Google Sheets access for leasesync.
//!
//! Reads the lease-id and balance columns into a [`leasesync_types::SheetSnapshot`]
//! and applies reconciled [`leasesync_types::WriteOp`]s in one batched write.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod range;

pub use auth::{ServiceAccountTokens, StaticToken, TokenProvider};
pub use client::SheetsClient;
pub use config::{SheetsConfig, ValueInputOption};
pub use error::{SheetsError, SheetsResult};

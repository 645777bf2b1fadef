//! Buildium API client for leasesync.
//!
//! Provides:
//! - Client-header or OAuth client-credentials authentication
//! - Paginated fetch of outstanding lease balances
//! - Lease and rental property lookups for newly seen leases

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::BuildiumClient;
pub use config::{BuildiumAuth, BuildiumConfig};
pub use error::{BuildiumError, BuildiumResult};

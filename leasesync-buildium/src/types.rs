//! Wire types for the Buildium endpoints used by leasesync.
//!
//! Only the fields leasesync reads are modeled; everything else in the
//! payloads is ignored.

use crate::error::{BuildiumError, BuildiumResult};
use leasesync_types::{LeaseDetails, LeaseRecord, lease::parse_balance};
use serde::{Deserialize, Deserializer};

/// One entry of `GET /leases/outstandingbalances`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutstandingBalance {
    pub lease_id: serde_json::Value,
    pub total_balance: serde_json::Value,
}

impl OutstandingBalance {
    pub fn into_record(self) -> BuildiumResult<LeaseRecord> {
        let lease_id = match &self.lease_id {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            other => {
                return Err(BuildiumError::Malformed(format!("unexpected LeaseId {other}")));
            }
        };
        let balance = parse_balance(&self.total_balance).map_err(|e| {
            BuildiumError::Malformed(format!("lease {lease_id}: {e}"))
        })?;
        Ok(LeaseRecord::new(lease_id, balance))
    }
}

/// `GET /leases/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lease {
    #[serde(default)]
    pub property_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current_tenants: Vec<Tenant>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tenant {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PhoneNumber {
    #[serde(default)]
    pub number: Option<String>,
}

/// `GET /rentals/{id}`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rental {
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(default)]
    pub address_line1: Option<String>,
}

/// Buildium sends `null` rather than `[]` for some empty lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Flattens a lease and its rental into the cells written for a new row.
pub fn lease_details(lease: &Lease, rental: Option<&Rental>) -> LeaseDetails {
    let tenant = lease.current_tenants.first();

    let tenant_name = tenant
        .map(|t| {
            format!(
                "{} {}",
                t.first_name.as_deref().unwrap_or_default(),
                t.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string()
        })
        .unwrap_or_default();

    let phone_number = tenant
        .and_then(|t| t.phone_numbers.first())
        .and_then(|p| p.number.clone())
        .unwrap_or_default();

    let address = rental
        .and_then(|r| r.address.as_ref())
        .and_then(|a| a.address_line1.clone())
        .unwrap_or_default();

    LeaseDetails {
        tenant_name,
        phone_number,
        address,
    }
}

/// Response of the client-credentials token endpoint.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

//! Lease records as fetched from the property-management API.

use crate::error::{TypesError, TypesResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One lease with an outstanding balance, produced fresh every sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub lease_id: String,
    pub outstanding_balance: Decimal,
}

impl LeaseRecord {
    pub fn new(lease_id: impl Into<String>, outstanding_balance: Decimal) -> Self {
        Self {
            lease_id: lease_id.into(),
            outstanding_balance,
        }
    }
}

/// Human-readable context written alongside a newly appended lease row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseDetails {
    pub tenant_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Parses a balance from a JSON value, accepting numbers and numeric strings.
///
/// Strings may carry a leading `$` and thousands separators, which is how
/// formatted spreadsheet cells come back.
pub fn parse_balance(value: &serde_json::Value) -> TypesResult<Decimal> {
    match value {
        serde_json::Value::Number(n) => parse_decimal(&n.to_string()),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            parse_decimal(&cleaned)
        }
        other => Err(TypesError::InvalidBalance(other.to_string())),
    }
}

fn parse_decimal(s: &str) -> TypesResult<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| TypesError::InvalidBalance(s.to_string()))
}

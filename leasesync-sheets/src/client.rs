//! HTTP client for the Sheets `values` endpoints.

use crate::auth::TokenProvider;
use crate::config::{SheetsConfig, ValueInputOption};
use crate::error::{SheetsError, SheetsResult};
use crate::range;
use leasesync_types::lease::parse_balance;
use leasesync_types::{Column, Decimal, LeaseDetails, SheetIndex, SheetSnapshot, WriteOp};
use reqwest::{Client, Response, StatusCode};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'a str,
    data: Vec<RangeWrite>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeWrite {
    range: String,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// Reads and writes the lease rows of one spreadsheet tab.
pub struct SheetsClient {
    client: Client,
    config: SheetsConfig,
    tokens: Arc<dyn TokenProvider>,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig, tokens: Arc<dyn TokenProvider>) -> SheetsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values{}",
            self.config.api_base_url, self.config.spreadsheet_id, suffix
        )
    }

    /// Reads the lease-id and balance columns, plus every column an append
    /// writes to, in one request.
    pub async fn snapshot(&self) -> SheetsResult<SheetSnapshot> {
        let start = self.config.data_start_row;
        let sheet = &self.config.sheet_name;
        let key_range = range::column_from(sheet, self.config.lease_id_column, start);
        let balance_range = range::column_from(sheet, self.config.balance_column, start);
        let row_range = range::rows_from(sheet, Column::A, self.config.last_column(), start);

        let token = self.tokens.token().await?;
        let resp = self
            .client
            .get(self.values_url(":batchGet"))
            .bearer_auth(token)
            .query(&[
                ("ranges", key_range.as_str()),
                ("ranges", balance_range.as_str()),
                ("ranges", row_range.as_str()),
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "UNFORMATTED_VALUE"),
            ])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let bytes = resp.bytes().await?;
        let body: BatchGetResponse = serde_json::from_slice(&bytes)
            .map_err(|e| SheetsError::Malformed(format!("values:batchGet: {e}")))?;

        let mut ranges = body.value_ranges.into_iter();
        let (Some(keys), Some(balances), Some(rows)) = (ranges.next(), ranges.next(), ranges.next())
        else {
            return Err(SheetsError::Malformed(
                "values:batchGet returned fewer than three ranges".to_string(),
            ));
        };

        let snapshot = build_snapshot(start, &keys.values, &balances.values, &rows.values);
        debug!(
            "read {} lease rows from sheet {}, next append row {}",
            snapshot.index.len(),
            self.config.sheet_name,
            snapshot.next_append_row
        );
        Ok(snapshot)
    }

    /// Applies `ops` in a single `values:batchUpdate`.
    ///
    /// Ops are first merged so each row is written by exactly one range.
    /// Appended rows are filled from `details` when the lease has an entry;
    /// cells outside the configured columns are left untouched.
    pub async fn apply(
        &self,
        ops: &[WriteOp],
        details: &HashMap<String, LeaseDetails>,
    ) -> SheetsResult<()> {
        if ops.is_empty() {
            debug!("no sheet writes to apply");
            return Ok(());
        }

        let merged = merge_by_row(ops);
        let request = BatchUpdateRequest {
            value_input_option: self.config.value_input_option.as_str(),
            data: merged.iter().map(|op| self.range_write(op, details)).collect(),
        };

        let token = self.tokens.token().await?;
        let resp = self
            .client
            .post(self.values_url(":batchUpdate"))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        check_status(resp).await?;
        debug!("applied {} sheet writes as {} ranges", ops.len(), merged.len());
        Ok(())
    }

    fn range_write(&self, op: &WriteOp, details: &HashMap<String, LeaseDetails>) -> RangeWrite {
        let sheet = &self.config.sheet_name;
        match op {
            WriteOp::Update {
                row_number,
                balance,
            } => RangeWrite {
                range: range::cell(sheet, self.config.balance_column, *row_number),
                major_dimension: "ROWS",
                values: vec![vec![self.balance_value(*balance)]],
            },
            WriteOp::Append {
                row_number,
                lease_id,
                balance,
            } => {
                let last = self.config.last_column();
                let mut row = vec![Value::Null; last.index() as usize + 1];
                let mut put = |column: Column, value: Value| row[column.index() as usize] = value;

                if let Some(d) = details.get(lease_id) {
                    put(self.config.tenant_name_column, Value::String(d.tenant_name.clone()));
                    put(self.config.address_column, Value::String(d.address.clone()));
                    put(self.config.phone_column, Value::String(d.phone_number.clone()));
                }
                put(self.config.balance_column, self.balance_value(*balance));
                put(self.config.lease_id_column, Value::String(lease_id.clone()));

                RangeWrite {
                    range: range::row_span(sheet, Column::A, last, *row_number),
                    major_dimension: "ROWS",
                    values: vec![row],
                }
            }
        }
    }

    /// Balance cell contents.
    ///
    /// `USER_ENTERED` gets the exact decimal text, which Sheets parses as a
    /// number. `RAW` would store text, so it gets a JSON number instead.
    fn balance_value(&self, balance: Decimal) -> Value {
        match self.config.value_input_option {
            ValueInputOption::UserEntered => Value::String(balance.to_string()),
            ValueInputOption::Raw => balance
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(balance.to_string())),
        }
    }
}

/// Folds ops that target an already-written row into that earlier op.
///
/// A later balance replaces the earlier one, so the row keeps its first
/// op's shape (an append stays an append) and the last balance.
pub fn merge_by_row(ops: &[WriteOp]) -> Vec<WriteOp> {
    let mut merged: Vec<WriteOp> = Vec::with_capacity(ops.len());
    let mut position: HashMap<u32, usize> = HashMap::new();

    for op in ops {
        match position.get(&op.row_number()) {
            Some(&i) => match &mut merged[i] {
                WriteOp::Update { balance, .. } | WriteOp::Append { balance, .. } => {
                    *balance = op.balance();
                }
            },
            None => {
                position.insert(op.row_number(), merged.len());
                merged.push(op.clone());
            }
        }
    }

    merged
}

/// Builds a snapshot from the column reads and the full-row read.
///
/// The Sheets API omits trailing blank rows and returns interior blank rows
/// as empty arrays, so the row of a cell is its position plus `start_row`.
/// `rows` covers every column an append writes, so a row holding only
/// tenant or note cells still counts as occupied.
pub fn build_snapshot(
    start_row: u32,
    keys: &[Vec<Value>],
    balances: &[Vec<Value>],
    rows: &[Vec<Value>],
) -> SheetSnapshot {
    let index = SheetIndex::scan(start_row, keys.iter().map(|row| row.first().and_then(key_text)));

    let mut balance_by_row = HashMap::new();
    for (offset, row) in balances.iter().enumerate() {
        let Some(cell) = row.first() else { continue };
        let row_number = start_row + offset as u32;
        match parse_balance(cell) {
            Ok(balance) => {
                balance_by_row.insert(row_number, balance);
            }
            Err(_) if cell.as_str().is_some_and(|s| s.trim().is_empty()) => {}
            Err(e) => warn!("ignoring balance cell on row {row_number}: {e}"),
        }
    }

    SheetSnapshot {
        index,
        balances: balance_by_row,
        next_append_row: start_row + keys.len().max(balances.len()).max(occupied_len(rows)) as u32,
    }
}

/// Number of rows up to and including the last one with a non-blank cell.
fn occupied_len(rows: &[Vec<Value>]) -> usize {
    rows.iter()
        .rposition(|row| row.iter().any(|cell| !is_blank(cell)))
        .map_or(0, |i| i + 1)
}

fn is_blank(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn key_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

async fn check_status(resp: Response) -> SheetsResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SheetsError::Auth(format!("{status}: {body}")));
    }
    Err(SheetsError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn snapshot_maps_rows_and_next_row() {
        let keys = vec![vec![json!("101")], vec![], vec![json!(103)]];
        let balances = vec![vec![json!(10.5)], vec![json!("")], vec![json!("$7.00")], vec![json!(1)]];

        let snap = build_snapshot(2, &keys, &balances, &[]);

        assert_eq!(snap.index.get("101"), Some(2));
        assert_eq!(snap.index.get("103"), Some(4));
        assert_eq!(snap.balances.get(&2), Some(&Decimal::new(105, 1)));
        assert_eq!(snap.balances.get(&3), None);
        assert_eq!(snap.balances.get(&4), Some(&Decimal::new(7, 0)));
        assert_eq!(snap.next_append_row, 6);
    }

    #[test]
    fn snapshot_of_empty_sheet() {
        let snap = build_snapshot(3, &[], &[], &[]);
        assert!(snap.index.is_empty());
        assert_eq!(snap.next_append_row, 3);
    }

    #[test]
    fn trailing_row_with_only_a_label_is_occupied() {
        let keys = vec![vec![json!("101")]];
        let balances = vec![vec![json!(5)]];
        let rows = vec![
            vec![json!("Ada"), json!(""), json!(""), json!(""), json!(5)],
            vec![],
            vec![json!("Totals")],
        ];

        let snap = build_snapshot(2, &keys, &balances, &rows);

        assert_eq!(snap.next_append_row, 5);
    }

    #[test]
    fn blank_strings_do_not_occupy_a_row() {
        let rows = vec![vec![json!("x")], vec![json!(""), json!("  "), Value::Null]];
        let snap = build_snapshot(2, &[], &[], &rows);
        assert_eq!(snap.next_append_row, 3);
    }

    #[test]
    fn merge_folds_update_into_earlier_append() {
        let ops = vec![
            WriteOp::Append {
                row_number: 7,
                lease_id: "L1".into(),
                balance: dec("10"),
            },
            WriteOp::Update {
                row_number: 3,
                balance: dec("1"),
            },
            WriteOp::Update {
                row_number: 7,
                balance: dec("20"),
            },
            WriteOp::Update {
                row_number: 3,
                balance: dec("2"),
            },
        ];

        assert_eq!(
            merge_by_row(&ops),
            vec![
                WriteOp::Append {
                    row_number: 7,
                    lease_id: "L1".into(),
                    balance: dec("20"),
                },
                WriteOp::Update {
                    row_number: 3,
                    balance: dec("2"),
                },
            ]
        );
    }
}

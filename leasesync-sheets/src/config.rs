//! Spreadsheet layout and API configuration.

use leasesync_types::Column;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the Sheets API interprets written values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    Raw,
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

impl fmt::Display for ValueInputOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for [`crate::SheetsClient`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Base URL for the Sheets REST API.
    pub api_base_url: String,

    pub spreadsheet_id: String,

    /// Tab holding the lease rows.
    pub sheet_name: String,

    pub lease_id_column: Column,

    pub balance_column: Column,

    /// Columns filled only when a lease row is appended.
    pub tenant_name_column: Column,
    pub address_column: Column,
    pub phone_column: Column,

    /// First data row; rows above it are headers.
    pub data_start_row: u32,

    pub value_input_option: ValueInputOption,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://sheets.googleapis.com/v4".to_string(),
            spreadsheet_id: String::new(),
            sheet_name: "Sheet1".to_string(),
            lease_id_column: Column::from_index(26), // AA
            balance_column: Column::from_index(4),   // E
            tenant_name_column: Column::from_index(0),
            address_column: Column::from_index(1),
            phone_column: Column::from_index(2),
            data_start_row: 2,
            value_input_option: ValueInputOption::UserEntered,
            timeout_secs: 30,
        }
    }
}

impl SheetsConfig {
    /// The right-most column an appended row touches.
    pub fn last_column(&self) -> Column {
        [
            self.lease_id_column,
            self.balance_column,
            self.tenant_name_column,
            self.address_column,
            self.phone_column,
        ]
        .into_iter()
        .max()
        .unwrap_or(Column::A)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sheet_layout() {
        let config = SheetsConfig::default();
        assert_eq!(config.lease_id_column.to_string(), "AA");
        assert_eq!(config.balance_column.to_string(), "E");
        assert_eq!(config.data_start_row, 2);
        assert_eq!(config.last_column().to_string(), "AA");
    }

    #[test]
    fn value_input_option_wire_names() {
        assert_eq!(ValueInputOption::Raw.to_string(), "RAW");
        assert_eq!(
            serde_json::to_string(&ValueInputOption::UserEntered).unwrap(),
            "\"USER_ENTERED\""
        );
    }
}

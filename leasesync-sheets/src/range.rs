//! A1 range strings.

use leasesync_types::Column;

/// Quotes a sheet name for use in an A1 range, doubling embedded quotes.
pub fn quote_sheet(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// An open-ended single-column range, e.g. `'Sheet1'!AA2:AA`.
pub fn column_from(sheet_name: &str, column: Column, start_row: u32) -> String {
    format!("{}!{}{}:{}", quote_sheet(sheet_name), column, start_row, column)
}

/// A single cell, e.g. `'Sheet1'!E7`.
pub fn cell(sheet_name: &str, column: Column, row: u32) -> String {
    format!("{}!{}", quote_sheet(sheet_name), column.cell(row))
}

/// One row between two columns, e.g. `'Sheet1'!A7:AA7`.
pub fn row_span(sheet_name: &str, first: Column, last: Column, row: u32) -> String {
    format!(
        "{}!{}:{}",
        quote_sheet(sheet_name),
        first.cell(row),
        last.cell(row)
    )
}

/// Open-ended rows between two columns, e.g. `'Sheet1'!A2:AA`.
pub fn rows_from(sheet_name: &str, first: Column, last: Column, start_row: u32) -> String {
    format!("{}!{}:{}", quote_sheet(sheet_name), first.cell(start_row), last)
}

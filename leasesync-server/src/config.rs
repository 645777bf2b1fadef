//! Startup configuration, read once from flags and environment.

use clap::{Parser, ValueEnum};
use leasesync_buildium::{BuildiumAuth, BuildiumConfig};
use leasesync_sheets::{SheetsConfig, ValueInputOption};
use leasesync_types::Column;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// Send client id and secret as request headers.
    Headers,
    /// Exchange client id and secret for a bearer token.
    Oauth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputOption {
    #[value(name = "RAW")]
    Raw,
    #[value(name = "USER_ENTERED")]
    UserEntered,
}

/// Service configuration.
#[derive(Clone, Debug, Parser)]
#[command(name = "leasesync", about = "Sync Buildium outstanding balances into a Google Sheet")]
pub struct ServerConfig {
    /// Spreadsheet id.
    #[arg(long, env = "SHEET_ID")]
    pub sheet_id: String,

    /// Tab holding the lease rows.
    #[arg(long, env = "SHEET_NAME", default_value = "Sheet1")]
    pub sheet_name: String,

    #[arg(long, env = "BUILD_IUM_CLIENT_ID")]
    pub buildium_client_id: String,

    #[arg(long, env = "BUILD_IUM_CLIENT_SECRET", hide_env_values = true)]
    pub buildium_client_secret: String,

    #[arg(long, env = "BUILDIUM_API_BASE", default_value = "https://api.buildium.com/v1")]
    pub buildium_api_base: String,

    #[arg(long, env = "BUILDIUM_AUTH", value_enum, default_value_t = AuthMode::Headers)]
    pub buildium_auth: AuthMode,

    /// Service-account key file for the Sheets API.
    #[arg(long, env = "GOOGLE_CREDENTIALS_PATH", default_value = "/secrets/creds.json")]
    pub credentials_path: PathBuf,

    #[arg(long, env = "SHEETS_API_BASE", default_value = "https://sheets.googleapis.com/v4")]
    pub sheets_api_base: String,

    #[arg(long, env = "LEASE_ID_COLUMN", default_value = "AA")]
    pub lease_id_column: Column,

    #[arg(long, env = "BALANCE_COLUMN", default_value = "E")]
    pub balance_column: Column,

    /// First data row; rows above are headers.
    #[arg(long, env = "DATA_START_ROW", default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub data_start_row: u32,

    #[arg(long, env = "VALUE_INPUT_OPTION", value_enum, ignore_case = true, default_value_t = InputOption::UserEntered)]
    pub value_input_option: InputOption,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServerConfig {
    pub fn buildium(&self) -> BuildiumConfig {
        BuildiumConfig {
            api_base_url: self.buildium_api_base.trim_end_matches('/').to_string(),
            client_id: self.buildium_client_id.clone(),
            client_secret: self.buildium_client_secret.clone(),
            auth: match self.buildium_auth {
                AuthMode::Headers => BuildiumAuth::ClientHeaders,
                AuthMode::Oauth => BuildiumAuth::OAuth,
            },
            ..BuildiumConfig::default()
        }
    }

    pub fn sheets(&self) -> SheetsConfig {
        SheetsConfig {
            api_base_url: self.sheets_api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: self.sheet_id.clone(),
            sheet_name: self.sheet_name.clone(),
            lease_id_column: self.lease_id_column,
            balance_column: self.balance_column,
            data_start_row: self.data_start_row,
            value_input_option: match self.value_input_option {
                InputOption::Raw => ValueInputOption::Raw,
                InputOption::UserEntered => ValueInputOption::UserEntered,
            },
            ..SheetsConfig::default()
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

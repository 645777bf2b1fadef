//! Buildium client configuration.

use serde::{Deserialize, Serialize};

/// How requests to Buildium are authenticated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildiumAuth {
    /// `x-buildium-client-id` / `x-buildium-client-secret` on every request.
    #[default]
    ClientHeaders,
    /// Client-credentials grant against `{api_base_url}/token`, sent as a bearer token.
    OAuth,
}

/// Configuration for [`crate::BuildiumClient`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildiumConfig {
    /// Base URL including the version segment (e.g., "https://api.buildium.com/v1").
    pub api_base_url: String,

    pub client_id: String,

    pub client_secret: String,

    pub auth: BuildiumAuth,

    /// Page size for the outstanding balances listing.
    pub page_size: usize,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BuildiumConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.buildium.com/v1".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            auth: BuildiumAuth::ClientHeaders,
            page_size: 1000,
            timeout_secs: 30,
        }
    }
}

impl BuildiumConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Self::default()
        }
    }
}

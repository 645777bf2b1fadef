//! Access tokens for the Sheets API.

use crate::error::{SheetsError, SheetsResult};
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;
use yup_oauth2::ServiceAccountAuthenticator;
use yup_oauth2::authenticator::DefaultAuthenticator;

/// OAuth scope granting read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Supplies bearer tokens for Sheets requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> SheetsResult<String>;
}

/// Mints tokens from a Google service-account key file.
///
/// Tokens are cached and refreshed by the underlying authenticator.
pub struct ServiceAccountTokens {
    authenticator: DefaultAuthenticator,
}

impl ServiceAccountTokens {
    pub async fn from_file(path: impl AsRef<Path>) -> SheetsResult<Self> {
        let path = path.as_ref();
        let key = yup_oauth2::read_service_account_key(path)
            .await
            .map_err(|e| SheetsError::Credentials(format!("{}: {e}", path.display())))?;

        debug!("loaded service account {} from {}", key.client_email, path.display());

        let authenticator = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| SheetsError::Credentials(e.to_string()))?;

        Ok(Self { authenticator })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokens {
    async fn token(&self) -> SheetsResult<String> {
        let token = self
            .authenticator
            .token(&[SPREADSHEETS_SCOPE])
            .await
            .map_err(|e| SheetsError::Auth(e.to_string()))?;

        token
            .token()
            .map(str::to_string)
            .ok_or_else(|| SheetsError::Auth("token response carried no access token".to_string()))
    }
}

/// A fixed token, for emulators and tests.
#[derive(Clone, Debug)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> SheetsResult<String> {
        Ok(self.0.clone())
    }
}

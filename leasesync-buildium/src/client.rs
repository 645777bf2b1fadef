//! HTTP client for the Buildium REST API.
//!
//! Handles both authentication schemes Buildium accepts, retries once on a
//! 401 when using OAuth, and pages through the outstanding balances listing.

use crate::config::{BuildiumAuth, BuildiumConfig};
use crate::error::{BuildiumError, BuildiumResult};
use crate::types::{Lease, OutstandingBalance, Rental, TokenResponse, lease_details};
use leasesync_types::{LeaseDetails, LeaseRecord};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// HTTP client for Buildium.
pub struct BuildiumClient {
    client: Client,
    config: BuildiumConfig,
    /// Cached OAuth access token. Unused with client-header auth.
    token: Arc<RwLock<Option<String>>>,
    /// Serializes token fetches so concurrent 401s share one refresh.
    token_lock: Arc<Mutex<()>>,
}

impl BuildiumClient {
    pub fn new(config: BuildiumConfig) -> BuildiumResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            token: Arc::new(RwLock::new(None)),
            token_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn config(&self) -> &BuildiumConfig {
        &self.config
    }

    // ── Auth ──

    /// Returns the cached OAuth token, fetching one if none is cached.
    pub async fn access_token(&self) -> BuildiumResult<String> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }

        let _guard = self.token_lock.lock().await;

        // Another caller may have fetched while we waited on the lock.
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }

        let url = format!("{}/token", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BuildiumError::AuthFailed(format!(
                "token request returned {status}: {body}"
            )));
        }

        let parsed: TokenResponse = decode(resp).await?;
        debug!("obtained Buildium access token");

        *self.token.write().await = Some(parsed.access_token.clone());
        Ok(parsed.access_token)
    }

    /// Drops the cached OAuth token.
    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    async fn authorize(&self, req: RequestBuilder) -> BuildiumResult<RequestBuilder> {
        let req = req.header(reqwest::header::ACCEPT, "application/json");
        match self.config.auth {
            BuildiumAuth::ClientHeaders => Ok(req
                .header("x-buildium-client-id", &self.config.client_id)
                .header("x-buildium-client-secret", &self.config.client_secret)),
            BuildiumAuth::OAuth => Ok(req.bearer_auth(self.access_token().await?)),
        }
    }

    /// Makes an authenticated GET request, retrying once on 401 under OAuth.
    async fn auth_get(&self, path: &str, query: &[(&str, String)]) -> BuildiumResult<Response> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let resp = self
            .authorize(self.client.get(&url).query(query))
            .await?
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED && self.config.auth == BuildiumAuth::OAuth {
            debug!("401 on GET {path}, refreshing token");
            self.clear_token().await;
            let retry = self
                .authorize(self.client.get(&url).query(query))
                .await?
                .send()
                .await?;
            return check_status(retry).await;
        }

        check_status(resp).await
    }

    // ── Balances ──

    /// Fetches every lease with an outstanding balance, following pagination.
    pub async fn outstanding_balances(&self) -> BuildiumResult<Vec<LeaseRecord>> {
        let limit = self.config.page_size.max(1);
        let mut offset = 0usize;
        let mut records = Vec::new();

        loop {
            let resp = self
                .auth_get(
                    "/leases/outstandingbalances",
                    &[("limit", limit.to_string()), ("offset", offset.to_string())],
                )
                .await?;
            let page: Vec<OutstandingBalance> = decode(resp).await?;
            let page_len = page.len();

            for entry in page {
                records.push(entry.into_record()?);
            }

            debug!("fetched {page_len} outstanding balances at offset {offset}");
            if page_len < limit {
                break;
            }
            offset += limit;
        }

        Ok(records)
    }

    // ── Leases ──

    pub async fn lease(&self, lease_id: &str) -> BuildiumResult<Lease> {
        let resp = self.auth_get(&format!("/leases/{lease_id}"), &[]).await?;
        decode(resp).await
    }

    pub async fn rental(&self, property_id: i64) -> BuildiumResult<Rental> {
        let resp = self.auth_get(&format!("/rentals/{property_id}"), &[]).await?;
        decode(resp).await
    }

    /// Looks up tenant and address details for a lease.
    ///
    /// A failed rental lookup leaves the address empty rather than failing
    /// the whole lookup.
    pub async fn lease_details(&self, lease_id: &str) -> BuildiumResult<LeaseDetails> {
        let lease = self.lease(lease_id).await?;

        let rental = match lease.property_id {
            Some(property_id) => match self.rental(property_id).await {
                Ok(rental) => Some(rental),
                Err(e) => {
                    warn!("rental {property_id} lookup failed for lease {lease_id}: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(lease_details(&lease, rental.as_ref()))
    }
}

async fn check_status(resp: Response) -> BuildiumResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BuildiumError::AuthFailed(format!("{status}: {body}")));
    }
    Err(BuildiumError::Api {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> BuildiumResult<T> {
    let url = resp.url().path().to_string();
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BuildiumError::Malformed(format!("{url}: {e}")))
}

//! HTTP client for the remote document store.
//!
//! Each of the four collections lives at `{base}/{collection}` with
//! individual documents at `{base}/{collection}/{id}`, all JSON. The
//! client owns retries for rate limiting; everything else surfaces as
//! a `RemoteError` for the caller to degrade on.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::cache::CollectionKey;
use crate::models::{Budget, Client as ClientRecord, Product, Representative};

use super::{RemoteError, RemoteSource};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
/// 3 retries with exponential backoff usually succeeds without excessive delay.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Client for the remote document store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create an ApiClient with the given bearer token, sharing the
    /// connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn auth_headers(&self) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        Ok(headers)
    }

    fn collection_url(&self, key: CollectionKey) -> String {
        format!("{}/{}", self.base_url, key.as_str())
    }

    fn document_url(&self, key: CollectionKey, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, key.as_str(), id)
    }

    /// Send a request built by `build`, retrying on 429 with
    /// exponential backoff. Non-success statuses other than 429 become
    /// `RemoteError`s carrying the targeted collection.
    async fn send_with_retry(
        &self,
        key: CollectionKey,
        url: &str,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = build()
                .headers(self.auth_headers()?)
                .send()
                .await
                .with_context(|| format!("Failed to send request to {}", url))?;

            if response.status().is_success() {
                return Ok(response);
            }

            if response.status().as_u16() == 429 {
                retries += 1;
                if retries > MAX_RATE_LIMIT_RETRIES {
                    return Err(RemoteError::RateLimited.into());
                }
                warn!(url, retry = retries, backoff_ms, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms *= 2;
                continue;
            }

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(key, status, &body).into());
        }
    }

    // ===== Generic document operations =====

    async fn list_docs<T: DeserializeOwned>(&self, key: CollectionKey) -> Result<Vec<T>> {
        let url = self.collection_url(key);
        let response = self
            .send_with_retry(key, &url, || self.client.get(&url))
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} list response", key))
    }

    /// Fetch one document. Absent (404) or malformed documents both
    /// come back as `None`; the collection listing is authoritative.
    async fn get_doc<T: DeserializeOwned>(
        &self,
        key: CollectionKey,
        id: &str,
    ) -> Result<Option<T>> {
        let url = self.document_url(key, id);
        let response = match self
            .send_with_retry(key, &url, || self.client.get(&url))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                if e.downcast_ref::<RemoteError>()
                    .is_some_and(RemoteError::is_not_found)
                {
                    return Ok(None);
                }
                return Err(e);
            }
        };

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} document body", key))?;

        match serde_json::from_str(&text) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                warn!(key = %key, id, error = %e, "Malformed document, treating as absent");
                Ok(None)
            }
        }
    }

    async fn create_doc<T: Serialize + DeserializeOwned>(
        &self,
        key: CollectionKey,
        item: &T,
    ) -> Result<T> {
        let url = self.collection_url(key);
        let response = self
            .send_with_retry(key, &url, || self.client.post(&url).json(item))
            .await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse created {} document", key))
    }

    async fn update_doc<T: Serialize>(&self, key: CollectionKey, id: &str, item: &T) -> Result<()> {
        let url = self.document_url(key, id);
        self.send_with_retry(key, &url, || self.client.put(&url).json(item))
            .await?;
        Ok(())
    }

    async fn delete_doc(&self, key: CollectionKey, id: &str) -> Result<()> {
        let url = self.document_url(key, id);
        self.send_with_retry(key, &url, || self.client.delete(&url))
            .await?;
        Ok(())
    }

    // ===== Budgets =====

    pub async fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.list_docs(CollectionKey::Budgets).await
    }

    pub async fn get_budget(&self, id: &str) -> Result<Option<Budget>> {
        self.get_doc(CollectionKey::Budgets, id).await
    }

    pub async fn create_budget(&self, budget: &Budget) -> Result<Budget> {
        self.create_doc(CollectionKey::Budgets, budget).await
    }

    pub async fn update_budget(&self, id: &str, budget: &Budget) -> Result<()> {
        self.update_doc(CollectionKey::Budgets, id, budget).await
    }

    pub async fn delete_budget(&self, id: &str) -> Result<()> {
        self.delete_doc(CollectionKey::Budgets, id).await
    }

    // ===== Clients =====

    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        self.list_docs(CollectionKey::Clients).await
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<ClientRecord>> {
        self.get_doc(CollectionKey::Clients, id).await
    }

    pub async fn create_client(&self, client: &ClientRecord) -> Result<ClientRecord> {
        self.create_doc(CollectionKey::Clients, client).await
    }

    pub async fn update_client(&self, id: &str, client: &ClientRecord) -> Result<()> {
        self.update_doc(CollectionKey::Clients, id, client).await
    }

    pub async fn delete_client(&self, id: &str) -> Result<()> {
        self.delete_doc(CollectionKey::Clients, id).await
    }

    // ===== Products =====

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.list_docs(CollectionKey::Products).await
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        self.get_doc(CollectionKey::Products, id).await
    }

    pub async fn create_product(&self, product: &Product) -> Result<Product> {
        self.create_doc(CollectionKey::Products, product).await
    }

    pub async fn update_product(&self, id: &str, product: &Product) -> Result<()> {
        self.update_doc(CollectionKey::Products, id, product).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.delete_doc(CollectionKey::Products, id).await
    }

    // ===== Representatives =====

    pub async fn list_representatives(&self) -> Result<Vec<Representative>> {
        self.list_docs(CollectionKey::Representatives).await
    }

    pub async fn get_representative(&self, id: &str) -> Result<Option<Representative>> {
        self.get_doc(CollectionKey::Representatives, id).await
    }

    pub async fn create_representative(&self, rep: &Representative) -> Result<Representative> {
        self.create_doc(CollectionKey::Representatives, rep).await
    }

    pub async fn update_representative(&self, id: &str, rep: &Representative) -> Result<()> {
        self.update_doc(CollectionKey::Representatives, id, rep).await
    }

    pub async fn delete_representative(&self, id: &str) -> Result<()> {
        self.delete_doc(CollectionKey::Representatives, id).await
    }
}

#[async_trait]
impl RemoteSource for ApiClient {
    async fn list_budgets(&self) -> Result<Vec<Budget>> {
        ApiClient::list_budgets(self).await
    }

    async fn list_clients(&self) -> Result<Vec<ClientRecord>> {
        ApiClient::list_clients(self).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        ApiClient::list_products(self).await
    }

    async fn list_representatives(&self) -> Result<Vec<Representative>> {
        ApiClient::list_representatives(self).await
    }
}

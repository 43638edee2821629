//! Inventory REST API client
//!
//! Reads every entity collection the stock views need and pushes ledger
//! mutations back. Collection endpoints answer either with a flat array or a
//! `{ data, meta: { total } }` page; both are accepted.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    CrateLineItem, Dispatch, InventoryError, InventorySnapshot, ListResponse, LooseStock, Loss,
    NewDispatch, NewLoss, NewReceivingBatch, OffloadRecord, PaginatedResponse, Pagination,
    ReceivingBatch, Tank,
};
use uuid::Uuid;
use validator::Validate;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

/// Inventory API client
#[derive(Clone)]
pub struct InventoryApiClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl InventoryApiClient {
    /// Create a new client from the API configuration
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn page_url(&self, path: &str, pagination: &Pagination) -> String {
        format!(
            "{}?page={}&limit={}",
            self.url(path),
            pagination.page,
            pagination.per_page
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder, url: &str) -> ClientResult<T> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Inventory API request to {} failed: {}", url, e);
            ClientError::Request {
                url: url.to_string(),
                source: e,
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Inventory API error from {}: {} - {}", url, status, body);
            return Err(ClientError::Api { status, body });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            source: e,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ClientResult<T> {
        self.send(self.client.get(url), url).await
    }

    /// Fetch one page of a collection
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        pagination: &Pagination,
    ) -> ClientResult<PaginatedResponse<T>> {
        let url = self.page_url(path, pagination);
        let page: ListResponse<T> = self.get_json(&url).await?;
        Ok(page.into_page())
    }

    /// Fetch every item of a collection, walking pages until the reported
    /// total is reached or an empty page comes back
    pub async fn fetch_all<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let mut items = Vec::new();
        let mut pagination = Pagination {
            page: 1,
            per_page: self.page_size,
        };

        loop {
            let url = self.page_url(path, &pagination);
            match self.get_json::<ListResponse<T>>(&url).await? {
                ListResponse::Flat(data) => {
                    tracing::debug!("{}: {} items (unpaginated)", path, data.len());
                    items.extend(data);
                    break;
                }
                ListResponse::Page(page) => {
                    let received = page.data.len();
                    items.extend(page.data);
                    tracing::debug!(
                        "{}: page {} returned {} items ({} of {})",
                        path,
                        pagination.page,
                        received,
                        items.len(),
                        page.meta.total
                    );
                    if received == 0 || items.len() as u64 >= page.meta.total {
                        break;
                    }
                    pagination.page += 1;
                }
            }
        }

        Ok(items)
    }

    pub async fn fetch_tanks(&self) -> ClientResult<Vec<Tank>> {
        self.fetch_all("tanks").await
    }

    pub async fn fetch_crates(&self) -> ClientResult<Vec<CrateLineItem>> {
        self.fetch_all("crates").await
    }

    pub async fn fetch_loose_stock(&self) -> ClientResult<Vec<LooseStock>> {
        self.fetch_all("loose-stock").await
    }

    pub async fn fetch_losses(&self) -> ClientResult<Vec<Loss>> {
        self.fetch_all("losses").await
    }

    pub async fn fetch_dispatches(&self) -> ClientResult<Vec<Dispatch>> {
        self.fetch_all("dispatches").await
    }

    pub async fn fetch_offloads(&self) -> ClientResult<Vec<OffloadRecord>> {
        self.fetch_all("offloads").await
    }

    pub async fn fetch_receiving_batches(&self) -> ClientResult<Vec<ReceivingBatch>> {
        self.fetch_all("receiving-batches").await
    }

    /// Fetch every collection concurrently into one snapshot
    pub async fn fetch_snapshot(&self) -> ClientResult<InventorySnapshot> {
        tracing::info!("Fetching inventory from {}", self.base_url);

        let (tanks, crates, loose_stock, losses, dispatches, offloads, receiving_batches) = tokio::try_join!(
            self.fetch_tanks(),
            self.fetch_crates(),
            self.fetch_loose_stock(),
            self.fetch_losses(),
            self.fetch_dispatches(),
            self.fetch_offloads(),
            self.fetch_receiving_batches(),
        )?;

        tracing::info!(
            "Fetched {} tanks, {} crates, {} loose stock entries, {} offloads",
            tanks.len(),
            crates.len(),
            loose_stock.len(),
            offloads.len()
        );

        Ok(InventorySnapshot {
            tanks,
            crates,
            loose_stock,
            losses,
            dispatches,
            offloads,
            receiving_batches,
            taken_at: Some(Utc::now()),
        })
    }

    async fn submit<B, T>(&self, request: reqwest::RequestBuilder, url: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(request.json(body), url).await
    }

    /// Record a loss against a crate or loose stock
    pub async fn create_loss(&self, input: &NewLoss) -> ClientResult<Loss> {
        input.validate().map_err(InventoryError::from)?;
        if input.crate_id.is_none() && input.loose_stock_id.is_none() {
            return Err(InventoryError::MissingStockReference.into());
        }
        let url = self.url("losses");
        self.submit(self.client.post(&url), &url, input).await
    }

    /// Record an export or regrade dispatch
    pub async fn create_dispatch(&self, input: &NewDispatch) -> ClientResult<Dispatch> {
        input.validate().map_err(InventoryError::from)?;
        if input.lines.is_empty() {
            return Err(InventoryError::EmptyDispatch.into());
        }
        let url = self.url("dispatches");
        self.submit(self.client.post(&url), &url, input).await
    }

    /// Replace a crate record (recheck, storage, emptying)
    pub async fn update_crate(&self, crate_id: Uuid, crate_item: &CrateLineItem) -> ClientResult<CrateLineItem> {
        let url = self.url(&format!("crates/{}", crate_id));
        self.submit(self.client.put(&url), &url, crate_item).await
    }

    /// Open a receiving batch for an offloaded trip
    pub async fn create_receiving_batch(&self, input: &NewReceivingBatch) -> ClientResult<ReceivingBatch> {
        input.validate().map_err(InventoryError::from)?;
        let url = self.url("receiving-batches");
        self.submit(self.client.post(&url), &url, input).await
    }
}

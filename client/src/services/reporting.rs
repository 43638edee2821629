//! Stock reporting service
//! Loads inventory from the API or a snapshot file and builds the combined
//! stock report: per-tank stock, stock by size, boat trips and free crate numbers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{BoatTripStock, InventorySnapshot, InventoryStore, SizeSummary, StockAggregator, TankStock};

use crate::api::InventoryApiClient;
use crate::config::{Config, DataSource};
use crate::error::{ClientError, ClientResult};
use crate::snapshot::SnapshotFile;

/// Where the report reads inventory from
#[derive(Clone)]
pub enum SnapshotSource {
    Api(InventoryApiClient),
    File(SnapshotFile),
}

impl SnapshotSource {
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        match config.source {
            DataSource::Api => Ok(SnapshotSource::Api(InventoryApiClient::new(&config.api)?)),
            DataSource::Snapshot => {
                let path = config
                    .snapshot
                    .path
                    .clone()
                    .ok_or(ClientError::MissingSnapshotPath)?;
                Ok(SnapshotSource::File(SnapshotFile::new(path)))
            }
        }
    }

    pub async fn load(&self) -> ClientResult<InventorySnapshot> {
        match self {
            SnapshotSource::Api(client) => client.fetch_snapshot().await,
            SnapshotSource::File(file) => file.load().await,
        }
    }
}

/// Facility stock report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockReport {
    pub generated_at: DateTime<Utc>,
    pub tanks: Vec<TankStock>,
    pub stock_by_size: SizeSummary,
    pub boat_trips: Vec<BoatTripStock>,
    pub available_crate_numbers: Vec<u32>,
}

impl StockReport {
    /// Build every stock view from one store
    pub fn from_store<S: InventoryStore + ?Sized>(store: &S) -> Self {
        let aggregator = StockAggregator::new(store);
        Self {
            generated_at: Utc::now(),
            tanks: aggregator.all_tanks_stock(),
            stock_by_size: aggregator.stock_by_size(),
            boat_trips: aggregator.boat_trip_stock(),
            available_crate_numbers: aggregator.available_crate_numbers(),
        }
    }
}

/// Reporting service
#[derive(Clone)]
pub struct StockReportService {
    source: SnapshotSource,
    persist_to: Option<SnapshotFile>,
}

impl StockReportService {
    pub fn new(source: SnapshotSource) -> Self {
        Self {
            source,
            persist_to: None,
        }
    }

    /// Also save every loaded snapshot to `file`
    pub fn persist_to(mut self, file: SnapshotFile) -> Self {
        self.persist_to = Some(file);
        self
    }

    /// Load the inventory and produce the stock report
    pub async fn generate(&self) -> ClientResult<StockReport> {
        let snapshot = self.source.load().await?;

        if let Some(file) = &self.persist_to {
            file.save(&snapshot).await?;
            tracing::info!("Snapshot saved to {}", file.path().display());
        }

        let report = StockReport::from_store(&snapshot);
        tracing::info!(
            "Stock report: {} tanks, {} kg in stock, {} boat trips, {} crate numbers free",
            report.tanks.len(),
            report.stock_by_size.total_kg(),
            report.boat_trips.len(),
            report.available_crate_numbers.len()
        );
        Ok(report)
    }
}

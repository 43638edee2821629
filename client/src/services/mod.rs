//! Services for the Lobster Stock Inventory client

pub mod local;
pub mod reporting;

pub use local::LocalInventory;
pub use reporting::{SnapshotSource, StockReport, StockReportService};

//! Lobster Stock Inventory client
//!
//! Fetches inventory collections from the backend API (or a saved snapshot),
//! runs the shared stock views over them and keeps a local ledger on disk.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod snapshot;

pub use api::InventoryApiClient;
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use snapshot::SnapshotFile;

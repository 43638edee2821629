//! Inventory backend API integrations

pub mod inventory;

pub use inventory::InventoryApiClient;

//! Shared types and models for the Lobster Stock Inventory
//!
//! This crate contains the domain model, the stock aggregation views and the
//! local mutation rules shared between the client and the browser (via WASM).

pub mod error;
pub mod ledger;
pub mod models;
pub mod stock;
pub mod store;
pub mod types;
pub mod validation;

pub use error::*;
pub use ledger::*;
pub use models::*;
pub use stock::*;
pub use store::*;
pub use types::*;
pub use validation::*;

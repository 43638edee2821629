//! Inventory store abstraction
//!
//! The aggregator reads collections through [`InventoryStore`] instead of a
//! global store. [`InventorySnapshot`] is the plain value implementation and
//! is also the unit that gets persisted or fetched from the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CrateLineItem, Dispatch, LooseStock, Loss, OffloadRecord, ReceivingBatch, Tank};

/// Read access to the entity collections
pub trait InventoryStore {
    fn tanks(&self) -> &[Tank];
    fn crates(&self) -> &[CrateLineItem];
    fn loose_stock(&self) -> &[LooseStock];
    fn losses(&self) -> &[Loss];
    fn dispatches(&self) -> &[Dispatch];
    fn offloads(&self) -> &[OffloadRecord];
}

/// Every entity collection at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InventorySnapshot {
    pub tanks: Vec<Tank>,
    pub crates: Vec<CrateLineItem>,
    pub loose_stock: Vec<LooseStock>,
    pub losses: Vec<Loss>,
    pub dispatches: Vec<Dispatch>,
    pub offloads: Vec<OffloadRecord>,
    pub receiving_batches: Vec<ReceivingBatch>,
    pub taken_at: Option<DateTime<Utc>>,
}

impl InventoryStore for InventorySnapshot {
    fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    fn crates(&self) -> &[CrateLineItem] {
        &self.crates
    }

    fn loose_stock(&self) -> &[LooseStock] {
        &self.loose_stock
    }

    fn losses(&self) -> &[Loss] {
        &self.losses
    }

    fn dispatches(&self) -> &[Dispatch] {
        &self.dispatches
    }

    fn offloads(&self) -> &[OffloadRecord] {
        &self.offloads
    }
}

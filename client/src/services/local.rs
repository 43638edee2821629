//! Ledger backed by a snapshot file
//!
//! Mutations go through [`shared::Inventory`]; the file is rewritten only
//! after a mutation succeeds, so a rejected operation never reaches disk.

use shared::{Inventory, InventoryResult};

use crate::error::ClientResult;
use crate::snapshot::SnapshotFile;

pub struct LocalInventory {
    file: SnapshotFile,
    inventory: Inventory,
}

impl LocalInventory {
    /// Open the ledger stored in `file`, starting empty if it does not exist
    pub async fn open(file: SnapshotFile) -> ClientResult<Self> {
        let snapshot = file.load_or_default().await?;
        Ok(Self {
            file,
            inventory: Inventory::from_snapshot(snapshot),
        })
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Apply a mutation and persist the result
    ///
    /// The mutation runs against a copy; the ledger is only replaced once the
    /// mutation succeeded and the snapshot was written.
    pub async fn apply<T, F>(&mut self, mutation: F) -> ClientResult<T>
    where
        F: FnOnce(&mut Inventory) -> InventoryResult<T>,
    {
        let mut draft = self.inventory.clone();
        let value = mutation(&mut draft)?;
        self.file.save(draft.snapshot()).await?;
        self.inventory = draft;
        Ok(value)
    }
}

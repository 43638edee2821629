//! Snapshot file persistence
//!
//! Stores an [`InventorySnapshot`] as pretty JSON so reports can be produced
//! offline and local ledger changes survive restarts.

use std::path::{Path, PathBuf};

use shared::InventorySnapshot;

use crate::error::{ClientError, ClientResult};

/// A snapshot stored on disk
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ClientError {
        ClientError::SnapshotIo {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the snapshot
    pub async fn load(&self) -> ClientResult<InventorySnapshot> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        let snapshot: InventorySnapshot = serde_json::from_slice(&raw)?;
        tracing::debug!(
            "Loaded snapshot from {} ({} tanks, {} crates)",
            self.path.display(),
            snapshot.tanks.len(),
            snapshot.crates.len()
        );
        Ok(snapshot)
    }

    /// Read the snapshot, starting empty when the file does not exist yet
    pub async fn load_or_default(&self) -> ClientResult<InventorySnapshot> {
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => self.load().await,
            Ok(false) => {
                tracing::info!("No snapshot at {}, starting empty", self.path.display());
                Ok(InventorySnapshot::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Write the snapshot, replacing any previous file in one rename
    pub async fn save(&self, snapshot: &InventorySnapshot) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec_pretty(snapshot)?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

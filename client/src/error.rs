//! Error handling for the Lobster Stock Inventory client

use std::path::PathBuf;

use shared::InventoryError;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    // Transport errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inventory API request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Inventory API error: {status} - {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Snapshot errors
    #[error("Snapshot file {path}: {source}", path = .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot format error: {0}")]
    SnapshotFormat(#[from] serde_json::Error),

    #[error("No snapshot path configured")]
    MissingSnapshotPath,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    // Domain errors
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

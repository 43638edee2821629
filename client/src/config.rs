//! Configuration management for the Lobster Stock Inventory client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with LSI_ prefix

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Where inventory collections are read from
    pub source: DataSource,

    /// Inventory REST API configuration
    pub api: ApiConfig,

    /// Local snapshot file configuration
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Fetch every collection from the REST API
    Api,
    /// Read a previously saved snapshot file
    Snapshot,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the inventory API, e.g. `http://localhost:3000/api/v1`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Items requested per page when walking paginated collections
    pub page_size: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SnapshotConfig {
    /// Snapshot file path. With `source = api` the fetched snapshot is
    /// also written here.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("LSI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("source", "api")?
            .set_default("api.base_url", "http://localhost:3000/api/v1")?
            .set_default("api.timeout_secs", 30)?
            .set_default("api.page_size", 100)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LSI_ prefix)
            .add_source(
                Environment::with_prefix("LSI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_string(),
            timeout_secs: 30,
            page_size: 100,
        }
    }
}

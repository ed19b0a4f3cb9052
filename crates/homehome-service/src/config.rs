//! Service configuration.

use std::path::Path;

use homehome_core::{EconomyConfig, ItemCatalog, RewardError};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/homehome").
    pub data_dir: String,

    /// Service API key for application-layer calls.
    pub service_api_key: Option<String>,

    /// Item catalog JSON file (default: "config/catalog.json").
    pub catalog_path: String,

    /// Optional JSON file overriding the reward tables.
    pub economy_config_path: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Prices, rates and reward tables.
    pub economy: EconomyConfig,
}

/// Errors raised while loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON for its type.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File path.
        path: String,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The contents were rejected by validation.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] RewardError),
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// The economy tables keep their defaults; see [`Self::load_economy`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/homehome".into()),
            service_api_key: std::env::var("SERVICE_API_KEY").ok(),
            catalog_path: std::env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "config/catalog.json".into()),
            economy_config_path: std::env::var("ECONOMY_CONFIG_PATH").ok(),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            economy: EconomyConfig::default(),
        }
    }

    /// Replace the default economy with the configured file, if any, and
    /// validate the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn load_economy(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &self.economy_config_path {
            self.economy = load_json_file(path)?;
            tracing::info!(path = %path, "Loaded economy configuration from file");
        } else {
            tracing::debug!("No economy configuration file, using defaults");
        }
        self.economy.validate()?;
        Ok(())
    }

    /// Load the item catalog and check every rarity can be drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a rarity has
    /// no drawable item.
    pub fn load_catalog(&self) -> Result<ItemCatalog, ConfigError> {
        let contents = read_file(&self.catalog_path)?;
        let catalog = ItemCatalog::from_json(&contents)?;
        catalog.ensure_drawable()?;
        tracing::info!(
            path = %self.catalog_path,
            items = catalog.entries().len(),
            "Loaded item catalog"
        );
        Ok(catalog)
    }
}

fn read_file(path: &str) -> Result<String, ConfigError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })
}

/// Load a JSON file into `T`.
fn load_json_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, ConfigError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/homehome".into(),
            service_api_key: None,
            catalog_path: "config/catalog.json".into(),
            economy_config_path: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            economy: EconomyConfig::default(),
        }
    }
}

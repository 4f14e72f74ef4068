//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults point at the public catalog and
//! a data file in the working directory.
//!
//! - `ATLAS_BASE_URL` - Catalog endpoint root
//!   (default: `https://rickandmortyapi.com/api/character`)
//! - `ATLAS_CACHE_TTL_SECS` - Cache time-to-live in seconds (default: 300)
//! - `ATLAS_DATA_PATH` - Path of the local key-value store file
//!   (default: `atlas-data.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default catalog endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/character";

/// Default cache TTL in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Default key-value store path.
pub const DEFAULT_DATA_PATH: &str = "atlas-data.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint root the client appends paths and queries to.
    pub base_url: String,
    /// How long cached pages and characters stay live.
    pub cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// Full client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog API configuration.
    pub catalog: CatalogConfig,
    /// Path of the local key-value store file.
    pub data_path: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("ATLAS_BASE_URL", DEFAULT_BASE_URL);
        let ttl_secs = get_env_or_default(
            "ATLAS_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ATLAS_CACHE_TTL_SECS".to_owned(), e.to_string())
        })?;
        let data_path = PathBuf::from(get_env_or_default("ATLAS_DATA_PATH", DEFAULT_DATA_PATH));

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                cache_ttl: Duration::from_secs(ttl_secs),
            },
            data_path,
        })
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

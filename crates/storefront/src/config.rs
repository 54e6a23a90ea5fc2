//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BOOKPEDIA_PROFILE_DIR` - Directory holding cart, history and accounts (default: `.bookpedia`)
//! - `BOOKPEDIA_CATALOG_URL` - Open Library base URL (default: `https://openlibrary.org`)
//! - `BOOKPEDIA_COVERS_URL` - Covers service base URL (default: `https://covers.openlibrary.org`)
//! - `BOOKPEDIA_CACHE_TTL_SECS` - How long catalog responses are cached (default: 300)
//! - `BOOKPEDIA_HTTP_TIMEOUT_SECS` - Catalog request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_PROFILE_DIR: &str = ".bookpedia";
const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org";
const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct BookpediaConfig {
    /// Directory for the file-backed storage profile
    pub profile_dir: PathBuf,
    /// Catalog client configuration
    pub catalog: CatalogConfig,
}

/// Catalog (Open Library) client configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL for subject, search and work lookups
    pub base_url: Url,
    /// Base URL for cover images
    pub covers_url: Url,
    /// Time-to-live for cached catalog responses
    pub cache_ttl: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BookpediaConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let profile_dir = PathBuf::from(get_env_or_default(
            "BOOKPEDIA_PROFILE_DIR",
            DEFAULT_PROFILE_DIR,
        ));
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            profile_dir,
            catalog,
        })
    }
}

impl CatalogConfig {
    /// Configuration for the given endpoints with default cache and timeout.
    #[must_use]
    pub const fn new(base_url: Url, covers_url: Url) -> Self {
        Self {
            base_url,
            covers_url,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_url("BOOKPEDIA_CATALOG_URL", DEFAULT_CATALOG_URL)?,
            covers_url: get_url("BOOKPEDIA_COVERS_URL", DEFAULT_COVERS_URL)?,
            cache_ttl: get_secs("BOOKPEDIA_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            timeout: get_secs("BOOKPEDIA_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an http(s) URL from the environment.
fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_http_url(key, &get_env_or_default(key, default))
}

/// Get a whole number of seconds from the environment.
fn get_secs(key: &str, default: u64) -> Result<Duration, ConfigError> {
    std::env::var(key).map_or(Ok(Duration::from_secs(default)), |value| {
        parse_secs(key, &value)
    })
}

fn parse_http_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

//! Key-value storage for storefront state.
//!
//! The storefront keeps everything in a flat string-to-string store, the way
//! a browser profile's local storage works: values are JSON documents written
//! and parsed by the callers.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - process-local map, used by tests and throwaway sessions
//! - [`FileStorage`] - one JSON file per key under a profile directory
//!
//! # Corrupt data
//!
//! [`read_list`] never fails: a missing key, an unreadable backend, a value
//! that is not a JSON array, or an array entry of the wrong shape all read as
//! "no data" and are logged at `warn`. Skipped entries stay on disk until the
//! next write of that key, which stores only the entries that were kept.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Storage keys used by the storefront.
pub mod keys {
    /// Items currently in the cart.
    pub const CART: &str = "bookpedia_cart";

    /// Items bought at checkout (purchase history).
    pub const PURCHASED: &str = "bookpedia_bought";

    /// Registered accounts.
    pub const USERS: &str = "users";

    /// The currently logged-in user.
    pub const LOGGED_IN_USER: &str = "loggedInUser";

    /// Listings shown by the last browse or search.
    pub const LISTINGS: &str = "bookpedia_listings";
}

/// Errors that can occur in a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend's internal lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A flat string key-value store.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read a JSON array stored under `key`.
///
/// Entries that do not decode as `T` are skipped; anything else that goes
/// wrong yields an empty list.
pub fn read_list<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "storage read failed, using empty list");
            return Vec::new();
        }
    };

    let entries = match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(serde_json::Value::Array(entries)) => entries,
        Ok(serde_json::Value::Null) => return Vec::new(),
        Ok(other) => {
            warn!(key, kind = json_kind(&other), "stored value is not a list, ignoring");
            return Vec::new();
        }
        Err(e) => {
            warn!(key, error = %e, "stored value is not valid JSON, ignoring");
            return Vec::new();
        }
    };

    let total = entries.len();
    let items: Vec<T> = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key, error = %e, "skipping malformed stored entry");
                None
            }
        })
        .collect();

    if items.len() < total {
        warn!(key, kept = items.len(), total, "dropped malformed entries");
    }
    items
}

/// Read a single JSON document stored under `key`.
///
/// Malformed content reads as `None`.
pub fn read_value<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "storage read failed");
            return None;
        }
    };

    serde_json::from_str::<Option<T>>(&raw)
        .inspect_err(|e| warn!(key, error = %e, "stored value is malformed, ignoring"))
        .ok()
        .flatten()
}

/// Write `items` under `key` as a JSON array.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the backend write fails.
pub fn write_list<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;
    storage.set_item(key, &json)
}

/// Write a single JSON document under `key`.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the backend write fails.
pub fn write_value<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    storage.set_item(key, &json)
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

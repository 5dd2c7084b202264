//! Profile storage module mirroring browser local storage
//!
//! This module provides a string-to-string key-value store scoped to a
//! single profile, with write-through persistence to an optional JSON
//! file. Values are opaque strings; callers JSON-encode their records,
//! exactly as the browser surfaces did against local storage.

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{StorageError, StorageResult};

/// Storage configuration struct
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    /// Path of the backing JSON file; `None` keeps the profile in memory only
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORAGE_PATH`: backing file path (default: "rental-profile.json")
    pub fn from_env() -> StorageResult<Self> {
        let path =
            std::env::var("STORAGE_PATH").unwrap_or_else(|_| "rental-profile.json".to_string());

        if path.is_empty() {
            return Err(StorageError::Configuration(
                "STORAGE_PATH must not be empty".to_string(),
            ));
        }

        Ok(StorageConfig {
            path: Some(PathBuf::from(path)),
        })
    }

    /// Configuration for a memory-only profile (used by tests)
    pub fn in_memory() -> Self {
        StorageConfig { path: None }
    }
}

/// Profile-scoped key-value store
///
/// A single writer is assumed; concurrent writers from separate
/// processes are not coordinated and the last write wins.
pub struct Storage {
    path: Option<PathBuf>,
    entries: RwLock<HashMap<String, String>>,
}

impl Storage {
    /// Open a storage profile, loading the backing file when it exists
    pub fn open(config: &StorageConfig) -> StorageResult<Self> {
        let entries = match &config.path {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            _ => HashMap::new(),
        };

        if let Some(path) = &config.path {
            info!("Storage profile backed by {}", path.display());
        }

        Ok(Storage {
            path: config.path.clone(),
            entries: RwLock::new(entries),
        })
    }

    /// Get the value stored under a key
    pub async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    /// Set a key-value pair, replacing any previous value
    pub async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    /// Remove a key; removing an absent key is a no-op
    pub async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        self.flush(&entries)
    }

    /// Check that the profile can be flushed to its backing file
    pub async fn health_check(&self) -> StorageResult<bool> {
        let entries = self.entries.read().await;
        self.flush(&entries)?;
        Ok(true)
    }

    fn flush(&self, entries: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(entries)?;
            std::fs::write(path, raw)?;
        }
        Ok(())
    }
}

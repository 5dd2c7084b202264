//! Custom error types for the common library
//!
//! This module defines the storage-level error types shared by the
//! services that persist state through the profile store.

use thiserror::Error;

/// Custom error type for profile storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error reading or writing the backing file
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error encoding or decoding the persisted profile
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

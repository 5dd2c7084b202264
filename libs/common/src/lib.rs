//! Common library for the rental booking application
//!
//! This crate provides shared functionality used across the services,
//! namely the profile-scoped key-value storage layer (the local-storage
//! analogue every surface persists through) and its error types.

pub mod error;
pub mod storage;

/// Example usage of the storage module
///
/// ```rust,no_run
/// use common::storage::{Storage, StorageConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let storage = Storage::open(&StorageConfig::from_env()?)?;
///     storage.set("bookings", "[]").await?;
///     println!("Bookings: {:?}", storage.get("bookings").await?);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}

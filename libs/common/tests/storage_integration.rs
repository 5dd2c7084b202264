//! Integration tests for the profile storage layer
//!
//! These tests verify that a storage profile written through the
//! key-value API survives a reopen, the way a browser profile survives
//! a page reload.

use std::collections::HashMap;

use common::storage::{Storage, StorageConfig};

/// Walk the storage API end to end against a file-backed profile
#[tokio::test]
async fn test_storage_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config = StorageConfig {
        path: Some(dir.path().join("profile.json")),
    };

    // First "session": populate the profile
    {
        let storage = Storage::open(&config)?;
        assert!(storage.health_check().await?, "Storage health check failed");

        storage.set("users", r#"[{"email":"alice@example.com"}]"#).await?;
        storage.set("user", r#"{"email":"alice@example.com"}"#).await?;
        storage.set("bookings", "[]").await?;
    }

    // Second "session": everything written is visible again
    let storage = Storage::open(&config)?;
    assert_eq!(
        storage.get("users").await?,
        Some(r#"[{"email":"alice@example.com"}]"#.to_string())
    );
    assert_eq!(
        storage.get("user").await?,
        Some(r#"{"email":"alice@example.com"}"#.to_string())
    );
    assert_eq!(storage.get("bookings").await?, Some("[]".to_string()));

    // Clearing the session slot persists too
    storage.remove("user").await?;
    let storage = Storage::open(&config)?;
    assert_eq!(storage.get("user").await?, None);

    // The backing file is a plain JSON object of raw string values
    let raw = std::fs::read_to_string(dir.path().join("profile.json"))?;
    let on_disk: HashMap<String, String> = serde_json::from_str(&raw)?;
    assert!(on_disk.contains_key("users"));
    assert!(!on_disk.contains_key("user"));

    Ok(())
}

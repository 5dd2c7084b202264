//! Session holder backed by the persisted profile
//!
//! A single slot under the `user` key: set by login and registration,
//! cleared by logout, restored when the service restarts.

use std::sync::Arc;

use common::storage::Storage;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::models::Identity;

const SESSION_KEY: &str = "user";

/// Holds the currently authenticated identity
#[derive(Clone)]
pub struct SessionHolder {
    storage: Arc<Storage>,
}

impl SessionHolder {
    /// Create a new session holder over a storage profile
    pub fn new(storage: Arc<Storage>) -> Self {
        SessionHolder { storage }
    }

    /// Read the current identity, if any
    ///
    /// An unreadable slot is discarded rather than surfaced, the same
    /// way a corrupt stored value is dropped on load.
    pub async fn get(&self) -> ApiResult<Option<Identity>> {
        match self.storage.get(SESSION_KEY).await? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(identity) => Ok(Some(identity)),
                Err(err) => {
                    warn!("Discarding unreadable session slot: {}", err);
                    self.storage.remove(SESSION_KEY).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Make an identity the active session
    pub async fn set(&self, identity: &Identity) -> ApiResult<()> {
        info!("Session set for {}", identity.email);
        self.storage
            .set(SESSION_KEY, &serde_json::to_string(identity)?)
            .await?;
        Ok(())
    }

    /// Clear the session; clearing an empty slot is a no-op
    pub async fn clear(&self) -> ApiResult<()> {
        info!("Session cleared");
        self.storage.remove(SESSION_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use common::storage::StorageConfig;

    fn identity() -> Identity {
        Identity {
            email: "alice@example.com".to_string(),
            role: Role::Customer,
            name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_set_get_clear() {
        let storage = Arc::new(Storage::open(&StorageConfig::in_memory()).expect("open"));
        let session = SessionHolder::new(storage);

        assert_eq!(session.get().await.expect("get"), None);

        session.set(&identity()).await.expect("set");
        assert_eq!(session.get().await.expect("get"), Some(identity()));

        session.clear().await.expect("clear");
        assert_eq!(session.get().await.expect("get"), None);

        // Logout is idempotent
        session.clear().await.expect("clear");
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_discarded() {
        let storage = Arc::new(Storage::open(&StorageConfig::in_memory()).expect("open"));
        storage.set("user", "{not json").await.expect("set");

        let session = SessionHolder::new(storage.clone());
        assert_eq!(session.get().await.expect("get"), None);
        assert_eq!(storage.get("user").await.expect("get"), None);
    }
}

//! User directory over the persisted profile

use std::sync::Arc;

use chrono::Utc;
use common::storage::Storage;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{Account, Identity, LoginCredentials, NewAccount, Role};
use crate::validation::{validate_email, validate_name, validate_password};

const USERS_KEY: &str = "users";

/// Static administrator credential pair
///
/// Checked ahead of the directory scan; the administrator identity is
/// synthesized and never stored alongside registered accounts.
const ADMIN_EMAIL: &str = "admin@gmail.com";
const ADMIN_PASSWORD: &str = "admin";
const ADMIN_NAME: &str = "Administrator";

/// User directory
#[derive(Clone)]
pub struct UserDirectory {
    storage: Arc<Storage>,
}

impl UserDirectory {
    /// Create a new user directory over a storage profile
    pub fn new(storage: Arc<Storage>) -> Self {
        UserDirectory { storage }
    }

    async fn load(&self) -> ApiResult<Vec<Account>> {
        match self.storage.get(USERS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, accounts: &[Account]) -> ApiResult<()> {
        self.storage
            .set(USERS_KEY, &serde_json::to_string(accounts)?)
            .await?;
        Ok(())
    }

    /// Register a new customer account
    ///
    /// The password is stored as provided. Accounts are never mutated
    /// after creation.
    pub async fn register(&self, new_account: &NewAccount) -> ApiResult<Account> {
        info!("Registering account for {}", new_account.email);

        validate_name(&new_account.name).map_err(ApiError::Validation)?;
        validate_email(&new_account.email).map_err(ApiError::Validation)?;
        validate_password(&new_account.password).map_err(ApiError::Validation)?;

        let mut accounts = self.load().await?;
        if accounts.iter().any(|a| a.email == new_account.email) {
            return Err(ApiError::DuplicateAccount);
        }

        let account = Account {
            email: new_account.email.clone(),
            password: new_account.password.clone(),
            role: Role::Customer,
            name: new_account.name.clone(),
            created_at: Utc::now(),
        };

        accounts.push(account.clone());
        self.store(&accounts).await?;

        Ok(account)
    }

    /// Authenticate an email/password pair
    ///
    /// The static administrator pair short-circuits the directory scan
    /// and yields a synthesized identity. Directory matches are exact
    /// and case-sensitive on both fields.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> ApiResult<Identity> {
        if credentials.email == ADMIN_EMAIL && credentials.password == ADMIN_PASSWORD {
            info!("Administrator login");
            return Ok(Identity {
                email: ADMIN_EMAIL.to_string(),
                role: Role::Admin,
                name: ADMIN_NAME.to_string(),
            });
        }

        let accounts = self.load().await?;
        let account = accounts
            .iter()
            .find(|a| a.email == credentials.email && a.password == credentials.password)
            .ok_or(ApiError::InvalidCredentials)?;

        info!("Login for {}", account.email);
        Ok(Identity::from(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::storage::StorageConfig;

    fn directory() -> UserDirectory {
        let storage = Arc::new(Storage::open(&StorageConfig::in_memory()).expect("open"));
        UserDirectory::new(storage)
    }

    fn alice() -> NewAccount {
        NewAccount {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "pw123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let directory = directory();

        let account = directory.register(&alice()).await.expect("register");
        assert_eq!(account.role, Role::Customer);
        assert_eq!(account.password, "pw123");

        let err = directory
            .register(&NewAccount {
                name: "Imposter".to_string(),
                ..alice()
            })
            .await
            .expect_err("duplicate must fail");
        assert!(matches!(err, ApiError::DuplicateAccount));

        // The existing account is unmodified
        let stored = directory.load().await.expect("load");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_authenticate_exact_match_only() {
        let directory = directory();
        directory.register(&alice()).await.expect("register");

        let identity = directory
            .authenticate(&LoginCredentials {
                email: "alice@example.com".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .expect("login");
        assert_eq!(identity.role, Role::Customer);

        // Wrong password
        let err = directory
            .authenticate(&LoginCredentials {
                email: "alice@example.com".to_string(),
                password: "PW123".to_string(),
            })
            .await
            .expect_err("wrong password");
        assert!(matches!(err, ApiError::InvalidCredentials));

        // Email comparison is case-sensitive too
        let err = directory
            .authenticate(&LoginCredentials {
                email: "Alice@example.com".to_string(),
                password: "pw123".to_string(),
            })
            .await
            .expect_err("case mismatch");
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_admin_bypass_skips_directory() {
        let directory = directory();

        // Works against an empty directory
        let identity = directory
            .authenticate(&LoginCredentials {
                email: "admin@gmail.com".to_string(),
                password: "admin".to_string(),
            })
            .await
            .expect("admin login");
        assert!(identity.is_admin());
        assert_eq!(identity.name, "Administrator");

        // And the pair is never stored
        assert!(directory.load().await.expect("load").is_empty());
    }
}

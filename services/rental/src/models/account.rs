//! Account model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Customer => "customer",
        }
    }
}

/// Registered account entity
///
/// The password is kept exactly as provided; there is no hashing step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Authenticated identity held by the session slot
///
/// Registered accounts produce their directory fields; the administrator
/// identity is synthesized from the static credential pair and never
/// stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: String,
    pub role: Role,
    pub name: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&Account> for Identity {
    fn from(account: &Account) -> Self {
        Identity {
            email: account.email.clone(),
            role: account.role,
            name: account.name.clone(),
        }
    }
}

/// New account registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

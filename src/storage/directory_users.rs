//! Directory User Storage Module
//!
//! In-memory registry backing the central directory fixture. Users are keyed by
//! their URI. The store is seeded with the canned Chris Griffin entry that
//! integration suites rely on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// URI of the seeded directory user.
pub const SEED_USER_URI: &str = "http://centraldirectory.com/griffin";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Directory entry for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryUser {
    /// User URI (lookup key)
    pub uri: String,
    /// Display name
    pub name: String,
    /// Ledger account of the user
    pub account: String,
    /// Currency code of the account
    pub currency: String,
}

// ============================================================================
// STORAGE IMPLEMENTATION
// ============================================================================

/// In-memory storage for directory users.
///
/// Thread-safe via RwLock; shared by all API handlers.
pub struct DirectoryUserStore {
    /// Map of uri -> DirectoryUser
    users: RwLock<HashMap<String, DirectoryUser>>,
}

impl DirectoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store containing the canned fixture user.
    pub fn seeded() -> Self {
        let seed = DirectoryUser {
            uri: SEED_USER_URI.to_string(),
            name: "Chris Griffin".to_string(),
            account: "http://receivingdfsp.com/griffin_12345".to_string(),
            currency: "USD".to_string(),
        };

        let mut users = HashMap::new();
        users.insert(seed.uri.clone(), seed);
        Self {
            users: RwLock::new(users),
        }
    }

    /// Get a user by URI.
    ///
    /// # Returns
    ///
    /// * `Some(DirectoryUser)` if registered
    /// * `None` otherwise
    pub async fn get_user(&self, uri: &str) -> Option<DirectoryUser> {
        let users = self.users.read().await;
        users.get(uri).cloned()
    }

    /// Insert or replace users.
    ///
    /// # Returns
    ///
    /// Number of entries written
    pub async fn upsert_users(&self, batch: Vec<DirectoryUser>) -> usize {
        let mut users = self.users.write().await;
        let count = batch.len();
        for user in batch {
            users.insert(user.uri.clone(), user);
        }
        count
    }
}

impl Default for DirectoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_store_contains_griffin() {
        let store = DirectoryUserStore::seeded();
        let user = store.get_user(SEED_USER_URI).await.unwrap();
        assert_eq!(user.name, "Chris Griffin");
        assert_eq!(user.currency, "USD");
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let store = DirectoryUserStore::new();
        let mut user = DirectoryUser {
            uri: "http://centraldirectory.com/meg".to_string(),
            name: "Meg".to_string(),
            account: "http://ledger/meg".to_string(),
            currency: "USD".to_string(),
        };
        assert_eq!(store.upsert_users(vec![user.clone()]).await, 1);

        user.currency = "EUR".to_string();
        store.upsert_users(vec![user.clone()]).await;

        assert_eq!(store.get_user(&user.uri).await, Some(user));
    }
}

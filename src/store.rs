// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store contract and the in-memory implementation.
//!
//! Authentication touches the store only at login (lookup by username) and
//! during user administration. Token validation never reaches this module.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthorityGroup;

/// A stored user credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: Uuid,
    pub username: String,
    /// Argon2 PHC string; never serialized into responses.
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub groups: BTreeSet<AuthorityGroup>,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        groups: impl IntoIterator<Item = AuthorityGroup>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            first_name: None,
            last_name: None,
            email: None,
            groups: groups.into_iter().collect(),
            created_at: Utc::now(),
        }
    }
}

/// Persisted authority group with its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthorityGroupRecord {
    pub group: AuthorityGroup,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User {0} already exists")]
    AlreadyExists(String),
}

/// Lookup-by-username contract consumed by the authentication subsystem.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError>;

    /// Insert a new credential; fails if the username is taken.
    async fn insert(&self, credential: Credential) -> Result<Credential, StoreError>;

    async fn list(&self) -> Result<Vec<Credential>, StoreError>;

    async fn find_group(
        &self,
        group: AuthorityGroup,
    ) -> Result<Option<AuthorityGroupRecord>, StoreError>;
}

/// In-memory credential store, keyed by username.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, Credential>>,
    groups: HashMap<AuthorityGroup, AuthorityGroupRecord>,
}

impl InMemoryCredentialStore {
    /// Empty user table with every authority group seeded.
    pub fn new() -> Self {
        let groups = AuthorityGroup::ALL
            .into_iter()
            .map(|group| {
                (
                    group,
                    AuthorityGroupRecord {
                        group,
                        description: group.description().to_string(),
                    },
                )
            })
            .collect();

        Self {
            users: RwLock::new(HashMap::new()),
            groups,
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, credential: Credential) -> Result<Credential, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&credential.username) {
            return Err(StoreError::AlreadyExists(credential.username));
        }
        users.insert(credential.username.clone(), credential.clone());
        Ok(credential)
    }

    async fn list(&self) -> Result<Vec<Credential>, StoreError> {
        let mut all: Vec<Credential> = self.users.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }

    async fn find_group(
        &self,
        group: AuthorityGroup,
    ) -> Result<Option<AuthorityGroupRecord>, StoreError> {
        Ok(self.groups.get(&group).cloned())
    }
}

/// Create the bootstrap administrator unless the username already exists.
///
/// Returns `true` when a credential was inserted.
pub async fn seed_admin(
    store: &dyn CredentialStore,
    username: &str,
    password_hash: String,
) -> Result<bool, StoreError> {
    if store.find_by_username(username).await?.is_some() {
        return Ok(false);
    }

    let credential = Credential::new(
        username,
        password_hash,
        [AuthorityGroup::Admin, AuthorityGroup::User],
    );
    store.insert(credential).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryCredentialStore::new();
        let credential = Credential::new("alice", "$hash", [AuthorityGroup::User]);
        store.insert(credential.clone()).await.unwrap();

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found, credential);
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_is_case_sensitive() {
        let store = InMemoryCredentialStore::new();
        store
            .insert(Credential::new("alice", "$hash", [AuthorityGroup::User]))
            .await
            .unwrap();
        assert!(store.find_by_username("Alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = InMemoryCredentialStore::new();
        store
            .insert(Credential::new("alice", "$hash", [AuthorityGroup::User]))
            .await
            .unwrap();
        let result = store
            .insert(Credential::new("alice", "$other", [AuthorityGroup::Admin]))
            .await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn list_is_sorted_by_username() {
        let store = InMemoryCredentialStore::new();
        for name in ["carol", "alice", "bob"] {
            store
                .insert(Credential::new(name, "$hash", [AuthorityGroup::User]))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.username)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[tokio::test]
    async fn every_group_is_seeded() {
        let store = InMemoryCredentialStore::new();
        for group in AuthorityGroup::ALL {
            let record = store.find_group(group).await.unwrap().unwrap();
            assert_eq!(record.group, group);
            assert_eq!(record.description, group.description());
        }
    }

    #[tokio::test]
    async fn seed_admin_is_idempotent() {
        let store = InMemoryCredentialStore::new();
        assert!(seed_admin(&store, "root", "$hash".into()).await.unwrap());
        assert!(!seed_admin(&store, "root", "$other".into()).await.unwrap());

        let root = store.find_by_username("root").await.unwrap().unwrap();
        assert_eq!(root.password_hash, "$hash");
        assert!(root.groups.contains(&AuthorityGroup::Admin));
    }
}

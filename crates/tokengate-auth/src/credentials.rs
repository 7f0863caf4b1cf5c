//! Credential checks
//!
//! The auth core only needs a yes/no answer plus a stable identity, so
//! storage lives behind [`CredentialStore`] and can be swapped without
//! touching issuance or verification.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::identity::Identity;

/// Looks up a username/password pair
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Return the identity owning these credentials, or `None` on any mismatch
    async fn authenticate(&self, username: &str, password: &str) -> Option<Identity>;
}

struct StoredUser {
    password: String,
    identity: Identity,
}

/// In-memory credential store
///
/// Passwords are held as given. Hashing is left to real stores.
#[derive(Default)]
pub struct StaticCredentialStore {
    users: HashMap<String, StoredUser>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the single built-in demo account (`admin` / `password123`)
    pub fn demo() -> Self {
        Self::new().with_user("admin", "password123", "1")
    }

    /// Add a user; the username doubles as the display name
    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        let username = username.into();
        let identity = Identity::new(subject_id, username.clone());
        self.users.insert(
            username,
            StoredUser {
                password: password.into(),
                identity,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        self.users
            .get(username)
            .filter(|user| user.password == password)
            .map(|user| user.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_user_matches() {
        let store = StaticCredentialStore::demo();

        let identity = store.authenticate("admin", "password123").await;

        assert_eq!(identity, Some(Identity::new("1", "admin")));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.authenticate("admin", "wrong").await, None);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.authenticate("root", "password123").await, None);
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.authenticate("Admin", "password123").await, None);
    }

    #[tokio::test]
    async fn test_multiple_users() {
        let store = StaticCredentialStore::new()
            .with_user("alice", "a-pass", "u-1")
            .with_user("bob", "b-pass", "u-2");

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.authenticate("bob", "b-pass").await,
            Some(Identity::new("u-2", "bob"))
        );
        assert_eq!(store.authenticate("alice", "b-pass").await, None);
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let store: Box<dyn CredentialStore> = Box::new(StaticCredentialStore::demo());
        assert!(store.authenticate("admin", "password123").await.is_some());
    }
}

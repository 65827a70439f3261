//! In-memory credential store.
//!
//! Reference adapter for [`UserRepository`], used for development and
//! tests until a durable store is wired. The map and both uniqueness
//! checks live under a single lock, so `create` is atomic: two concurrent
//! creations of the same username or email cannot both commit, and the
//! loser observes the matching duplicate error exactly as it would from a
//! database unique constraint.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{CreateUserError, NewUser, UserRepository, UserStoreError};
use crate::domain::{EmailAddress, User, UserId, Username};

/// Thread-safe in-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users. Test support.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Delete a user record. Test support for deleted-account scenarios.
    pub async fn remove(&self, id: &UserId) -> Option<User> {
        self.users.write().await.remove(id.as_uuid())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().any(|user| user.username() == username))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().any(|user| user.email() == email))
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.get(id.as_uuid()).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, CreateUserError> {
        // Single write lock across check and insert keeps uniqueness atomic.
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|user| user.username() == &new_user.username)
        {
            return Err(CreateUserError::DuplicateUsername);
        }
        if users.values().any(|user| user.email() == &new_user.email) {
            return Err(CreateUserError::DuplicateEmail);
        }
        let user = User::from(new_user);
        users.insert(*user.id().as_uuid(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PasswordHash;
    use chrono::Utc;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            id: UserId::random(),
            username: Username::new(username).expect("username"),
            email: EmailAddress::new(email).expect("email"),
            password_hash: PasswordHash::new("$2b$04$fixturefixturefixturefix"),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("alice", "alice@x.com")).await.expect("create");

        let by_id = repo
            .find_by_id(created.id())
            .await
            .expect("read")
            .expect("present");
        assert_eq!(by_id, created);

        let by_email = repo
            .find_by_email(&EmailAddress::new("alice@x.com").expect("email"))
            .await
            .expect("read")
            .expect("present");
        assert_eq!(by_email, created);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_and_nothing_is_committed() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "alice@x.com")).await.expect("create");

        let err = repo
            .create(new_user("alice", "other@x.com"))
            .await
            .expect_err("duplicate username");
        assert!(matches!(err, CreateUserError::DuplicateUsername));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_nothing_is_committed() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "alice@x.com")).await.expect("create");

        let err = repo
            .create(new_user("bob", "alice@x.com"))
            .await
            .expect_err("duplicate email");
        assert!(matches!(err, CreateUserError::DuplicateEmail));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_insensitive_via_normalisation() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "Alice@X.com")).await.expect("create");

        // EmailAddress lowercases on construction, so the mixed-case
        // variant arrives as the same key.
        let err = repo
            .create(new_user("bob", "ALICE@x.com"))
            .await
            .expect_err("same email after normalisation");
        assert!(matches!(err, CreateUserError::DuplicateEmail));
    }

    #[tokio::test]
    async fn usernames_remain_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice", "alice@x.com")).await.expect("create");
        repo.create(new_user("Alice", "other@x.com"))
            .await
            .expect("distinct username");
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn exists_checks_reflect_the_store() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty().await);
        repo.create(new_user("alice", "alice@x.com")).await.expect("create");

        assert!(repo
            .exists_by_username(&Username::new("alice").expect("username"))
            .await
            .expect("read"));
        assert!(!repo
            .exists_by_username(&Username::new("bob").expect("username"))
            .await
            .expect("read"));
        assert!(repo
            .exists_by_email(&EmailAddress::new("alice@x.com").expect("email"))
            .await
            .expect("read"));
    }

    #[tokio::test]
    async fn remove_unresolves_the_user() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(new_user("alice", "alice@x.com")).await.expect("create");
        repo.remove(created.id()).await.expect("was present");
        assert!(repo
            .find_by_id(created.id())
            .await
            .expect("read")
            .is_none());
    }
}

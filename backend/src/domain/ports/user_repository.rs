//! Port abstraction for the credential store and its errors.
//!
//! Adapters own uniqueness enforcement: a `create` racing an identical
//! username or email must fail with the matching [`CreateUserError`]
//! variant rather than committing a duplicate. The service's existence
//! pre-checks are a fast path for user-facing messages only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::user::{EmailAddress, PasswordHash, User, UserId, Username};

/// Persistence errors raised by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserStoreError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },
}

impl UserStoreError {
    /// Connection-level failure.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-level failure.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Failures creating a user record.
///
/// The duplicate variants surface storage-level uniqueness violations that
/// slipped past the service's pre-checks (a check-then-create race).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateUserError {
    #[error("username is already taken")]
    DuplicateUsername,
    #[error("email is already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Store(#[from] UserStoreError),
}

/// Fully-validated parameters for a user creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

/// Credential store port.
///
/// All methods take normalised keys (see [`Username`] and [`EmailAddress`])
/// and abort with the enclosing request when the calling future is dropped.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Whether an account with this username exists.
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserStoreError>;

    /// Whether an account with this email exists.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserStoreError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserStoreError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Atomically create a user, enforcing username and email uniqueness.
    async fn create(&self, new_user: NewUser) -> Result<User, CreateUserError>;
}

impl From<NewUser> for User {
    fn from(value: NewUser) -> Self {
        let NewUser {
            id,
            username,
            email,
            password_hash,
            created_at,
        } = value;
        Self::new(id, username, email, password_hash, created_at)
    }
}

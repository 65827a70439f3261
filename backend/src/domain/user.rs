//! User identity aggregate and its validated components.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Validation errors returned by the constructors in this module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("email must not be empty")]
    EmptyEmail,
}

/// Stable user identifier backed by a UUID.
///
/// Generated once at account creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its string form.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a fresh random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique account handle.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty afterwards.
/// - Case-sensitive: `Alice` and `alice` are distinct usernames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = username.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique account email address.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty afterwards.
/// - Lowercased on construction, so uniqueness and lookups are
///   case-insensitive. This is the fixed normalisation policy: adapters
///   never see mixed-case email keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, normalise, and construct an [`EmailAddress`].
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque, self-describing password hash.
///
/// Holds the modular-crypt output of the hashing adapter (algorithm, cost,
/// and salt are encoded in the string). `Debug` is redacted so the hash
/// never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-computed hash string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// The encoded hash, for storage or verification only.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `username` and `email` are each globally unique across all users;
///   uniqueness is enforced atomically by the credential store.
/// - `password_hash` never contains the plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        username: Username,
        email: EmailAddress,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique account handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Unique, normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored credential hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Account creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

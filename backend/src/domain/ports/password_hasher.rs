//! Port abstraction for password hashing and verification.

use async_trait::async_trait;

use crate::domain::user::PasswordHash;

/// Failure computing a password hash.
///
/// Hashing only fails on catastrophic entropy or resource exhaustion, so
/// callers treat this as a system error rather than user feedback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    /// Wrap an adapter-level failure message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One-way, salted, adaptive password hashing port.
///
/// The produced hash is self-describing: algorithm parameters and salt are
/// encoded in the output, so `verify` needs no out-of-band configuration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Verify a candidate against a stored hash.
    ///
    /// A malformed stored hash is a non-match, never an error: the caller's
    /// control flow treats it exactly like a wrong password.
    async fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool;
}

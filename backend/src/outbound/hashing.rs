//! Bcrypt adapter for the password hashing port.
//!
//! Bcrypt output is modular-crypt encoded, so the cost factor and salt
//! travel with the hash and verification needs no configuration. Hashing
//! and verification are CPU-bound by design and run on the blocking pool
//! to keep the reactor responsive.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::PasswordHash;

/// [`PasswordHasher`] backed by the `bcrypt` crate.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with the library default cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Hasher with an explicit cost; tests use the bcrypt minimum to stay
    /// fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|err| PasswordHashError::new(format!("hashing task failed: {err}")))?
            .map_err(|err| PasswordHashError::new(err.to_string()))?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool {
        let encoded = hash.expose().to_owned();
        let candidate = candidate.to_owned();
        let verified =
            tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &encoded)).await;
        match verified {
            Ok(Ok(matched)) => matched,
            // A malformed stored hash is a non-match, not a caller error.
            Ok(Err(err)) => {
                warn!(error = %err, "stored password hash failed to parse");
                false
            }
            Err(err) => {
                warn!(error = %err, "verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast.
    fn fast_hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::with_cost(4)
    }

    #[tokio::test]
    async fn hash_round_trips_with_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse battery staple").await.expect("hash");
        assert!(hasher.verify(&hash, "correct horse battery staple").await);
        assert!(!hasher.verify(&hash, "correct horse battery staplex").await);
    }

    #[tokio::test]
    async fn hash_is_not_the_plaintext_and_self_describes() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret1").await.expect("hash");
        assert!(!hash.expose().contains("secret1"));
        // Modular-crypt prefix carries algorithm and cost.
        assert!(hash.expose().starts_with("$2"));
    }

    #[tokio::test]
    async fn same_plaintext_hashes_differently_per_salt() {
        let hasher = fast_hasher();
        let first = hasher.hash("secret1").await.expect("hash");
        let second = hasher.hash("secret1").await.expect("hash");
        assert_ne!(first.expose(), second.expose());
    }

    #[tokio::test]
    async fn malformed_stored_hash_is_a_non_match() {
        let hasher = fast_hasher();
        let mangled = PasswordHash::new("not-a-bcrypt-hash");
        assert!(!hasher.verify(&mangled, "anything").await);
    }
}

//! Ports consumed by the authentication use-case.
//!
//! In hexagonal terms these are *driven* ports: the domain calls them and
//! adapters implement them, so service tests can substitute doubles instead
//! of wiring real persistence or a real hash function.

pub mod password_hasher;
pub mod user_repository;

pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use user_repository::{CreateUserError, NewUser, UserRepository, UserStoreError};

#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use user_repository::MockUserRepository;

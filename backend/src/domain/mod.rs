//! Domain primitives and the authentication use-case.
//!
//! Purpose: define strongly typed domain entities consumed by the HTTP
//! adapter and persistence ports. Types are immutable; invariants and
//! normalisation policy are documented on each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — transport-agnostic failure payload.
//! - `User`, `UserId`, `Username`, `EmailAddress`, `PasswordHash` — the
//!   identity aggregate and its validated components.
//! - `LoginCredentials`, `SignupDetails` — transient, validated input.
//! - `FieldErrors` — per-field validation outcome.
//! - `AuthService` — login/signup orchestration over the ports.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod user;
pub mod validation;

pub use self::auth::{AuthValidationError, LoginCredentials, SignupDetails};
pub use self::auth_service::{AuthService, LoginOutcome, SignupOutcome};
pub use self::error::{Error, ErrorCode};
pub use self::user::{
    EmailAddress, PasswordHash, User, UserId, UserValidationError, Username,
};
pub use self::validation::FieldErrors;

/// Convenient result alias for fallible domain and handler code.
pub type ApiResult<T> = Result<T, Error>;

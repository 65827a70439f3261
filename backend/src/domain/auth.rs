//! Transient authentication inputs.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Plaintext passwords are held in [`Zeroizing`] buffers and are never
//! persisted or logged.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{EmailAddress, Username};

/// Domain error returned when authentication payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised per [`EmailAddress`] policy.
/// - `password` must be non-empty but retains caller-provided whitespace to
///   avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use gatehouse::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@x.com", "secret1").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@x.com");
/// assert_eq!(creds.password(), "secret1");
/// ```
#[derive(Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        let email = EmailAddress::new(email).map_err(|_| AuthValidationError::EmptyEmail)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated signup details.
///
/// Field presence is enforced here; business rules (uniqueness, minimum
/// password length) belong to the auth service so they can be reported
/// cumulatively.
#[derive(Clone)]
pub struct SignupDetails {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl fmt::Debug for SignupDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDetails")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl SignupDetails {
    /// Construct signup details from raw string inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, AuthValidationError> {
        let username = Username::new(username).map_err(|_| AuthValidationError::EmptyUsername)?;
        let email = EmailAddress::new(email).map_err(|_| AuthValidationError::EmptyEmail)?;
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested account handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Normalised email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

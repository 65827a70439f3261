//! Login and signup orchestration over the credential store and hasher.
//!
//! Business-rule violations are reported as [`FieldErrors`] inside the `Ok`
//! branch of each outcome; the `Err` branch is reserved for system failures
//! (store unreachable, hashing failure). Keeping the channels separate lets
//! adapters choose user-facing wording per kind.
//!
//! Validation always completes before any mutation: a signup that fails any
//! field check never reaches hashing or the store's `create`.

use std::sync::Arc;

use chrono::Utc;

use super::auth::{LoginCredentials, SignupDetails};
use super::error::Error;
use super::ports::{CreateUserError, NewUser, PasswordHasher, UserRepository, UserStoreError};
use super::user::{User, UserId};
use super::validation::{messages, FieldErrors, PASSWORD_MIN_CHARS};
use super::ApiResult;

/// Outcome of a login attempt that reached the service.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials matched; session creation is the caller's responsibility.
    Authenticated(User),
    /// One or more validation rules failed.
    Rejected(FieldErrors),
}

/// Outcome of a signup attempt that reached the service.
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    /// The account was created and persisted.
    Created(User),
    /// One or more validation rules failed; nothing was persisted.
    Rejected(FieldErrors),
}

/// Authentication use-case composed from the domain ports.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Compose the service from its ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Validate credentials against the stored account.
    ///
    /// An unknown email is reported as an email field error and the
    /// password is never compared. This intentionally distinguishes
    /// "unknown account" from "wrong password" in user-facing wording, an
    /// enumeration trade-off inherited from the product requirements.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiResult<LoginOutcome> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(store_failure)?
        else {
            let mut errors = FieldErrors::default();
            errors.set_email(messages::USER_NOT_FOUND);
            return Ok(LoginOutcome::Rejected(errors));
        };

        if !self
            .hasher
            .verify(user.password_hash(), credentials.password())
            .await
        {
            let mut errors = FieldErrors::default();
            errors.set_password(messages::INVALID_CREDENTIALS);
            return Ok(LoginOutcome::Rejected(errors));
        }

        Ok(LoginOutcome::Authenticated(user))
    }

    /// Run every signup rule and report all violations together.
    ///
    /// The three rules are independent and cumulative; no short-circuit on
    /// the first failure. Store failures abort with a system error instead
    /// of a partially-filled [`FieldErrors`].
    pub async fn validate_signup(&self, details: &SignupDetails) -> ApiResult<FieldErrors> {
        let mut errors = FieldErrors::default();

        if self
            .users
            .exists_by_username(details.username())
            .await
            .map_err(store_failure)?
        {
            errors.set_username(messages::USERNAME_TAKEN);
        }

        if self
            .users
            .exists_by_email(details.email())
            .await
            .map_err(store_failure)?
        {
            errors.set_email(messages::EMAIL_TAKEN);
        }

        if details.password().chars().count() < PASSWORD_MIN_CHARS {
            errors.set_password(messages::PASSWORD_TOO_SHORT);
        }

        Ok(errors)
    }

    /// Create an account once every validation rule passes.
    ///
    /// The existence pre-checks above are a UX fast path; correctness rests
    /// on the store's atomic uniqueness enforcement. A duplicate surfacing
    /// from `create` therefore indicates a check-then-create race and is
    /// logged before being reported as a conflict.
    pub async fn signup(&self, details: &SignupDetails) -> ApiResult<SignupOutcome> {
        let errors = self.validate_signup(details).await?;
        if errors.has_errors() {
            return Ok(SignupOutcome::Rejected(errors));
        }

        let password_hash = self.hasher.hash(details.password()).await.map_err(|err| {
            tracing::error!(error = %err, "password hashing failed");
            Error::internal(err.to_string())
        })?;

        let new_user = NewUser {
            id: UserId::random(),
            username: details.username().clone(),
            email: details.email().clone(),
            password_hash,
            created_at: Utc::now(),
        };

        match self.users.create(new_user).await {
            Ok(user) => Ok(SignupOutcome::Created(user)),
            Err(CreateUserError::DuplicateUsername) => {
                tracing::warn!(
                    username = %details.username(),
                    "username uniqueness race between pre-check and create"
                );
                Err(Error::conflict(messages::USERNAME_TAKEN))
            }
            Err(CreateUserError::DuplicateEmail) => {
                tracing::warn!(
                    email = %details.email(),
                    "email uniqueness race between pre-check and create"
                );
                Err(Error::conflict(messages::EMAIL_TAKEN))
            }
            Err(CreateUserError::Store(err)) => Err(store_failure(err)),
        }
    }
}

fn store_failure(err: UserStoreError) -> Error {
    tracing::error!(error = %err, "credential store failure");
    Error::internal(err.to_string())
}

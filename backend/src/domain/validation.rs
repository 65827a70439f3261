//! Per-field validation outcome for login and signup.

use serde::Serialize;

/// Minimum password length, measured in characters rather than bytes.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// User-facing validation messages.
///
/// Login deliberately distinguishes an unknown email from a bad password;
/// see the service docs for the enumeration trade-off this implies.
pub mod messages {
    /// Unknown email at login.
    pub const USER_NOT_FOUND: &str = "User not found";
    /// Known email, password mismatch.
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
    /// Signup username collision.
    pub const USERNAME_TAKEN: &str = "An account with this username already exists";
    /// Signup email collision.
    pub const EMAIL_TAKEN: &str = "An account with this email already exists";
    /// Signup password below [`super::PASSWORD_MIN_CHARS`].
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long";
}

/// Field-level validation errors for {username, email, password}.
///
/// A field being `None` means none of the rules enumerated for the current
/// operation flagged it — not that every conceivable rule passed.
///
/// # Examples
/// ```
/// use gatehouse::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// assert!(!errors.has_errors());
/// errors.set_password("too short");
/// assert!(errors.has_errors());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl FieldErrors {
    /// True iff any field carries an error message.
    pub fn has_errors(&self) -> bool {
        self.username.is_some() || self.email.is_some() || self.password.is_some()
    }

    /// Record a username error.
    pub fn set_username(&mut self, message: impl Into<String>) {
        self.username = Some(message.into());
    }

    /// Record an email error.
    pub fn set_email(&mut self, message: impl Into<String>) {
        self.email = Some(message.into());
    }

    /// Record a password error.
    pub fn set_password(&mut self, message: impl Into<String>) {
        self.password = Some(message.into());
    }

    /// Username error message, if any.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Email error message, if any.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Password error message, if any.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

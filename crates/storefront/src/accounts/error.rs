//! Account error types.

use thiserror::Error;

use crate::storage::StorageError;

/// A password rule the signup form enforces, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    /// The message shown under the signup form.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MinLength => "Password must be at least 8 characters.",
            Self::Uppercase => "Password must contain an uppercase letter.",
            Self::Lowercase => "Password must contain a lowercase letter.",
            Self::Digit => "Password must contain a number.",
            Self::Special => "Password must contain a special character.",
        }
    }
}

impl std::fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors that can occur during signup, login or logout.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bookpedia_core::EmailError),

    /// Name is empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// Password breaks a signup rule.
    #[error("{0}")]
    WeakPassword(PasswordRule),

    /// An account with this email already exists.
    #[error("Account with this email already exists!")]
    AlreadyExists,

    /// No account matches the name or email given at login.
    #[error("User not found!")]
    UserNotFound,

    /// The account exists but the password does not match.
    #[error("Incorrect password!")]
    IncorrectPassword,

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

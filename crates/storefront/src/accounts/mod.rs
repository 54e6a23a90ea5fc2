//! Account service: signup, login, logout and the current user.
//!
//! Accounts live in storage next to the cart, as a JSON list of
//! `{name, email, password}` records. Passwords are kept as typed. This is a
//! demo credential store, not an authentication system: anyone who can read
//! the profile directory can read them.
//!
//! Login stores an [`IdentitySnapshot`] (name and email only) under
//! `loggedInUser`; the service doubles as the cart's [`IdentitySource`].

mod error;
pub mod quotes;

pub use error::{AccountError, PasswordRule};
pub use quotes::{QUOTES, QuoteRotator};

use std::sync::Arc;

use bookpedia_core::{Email, IdentitySnapshot};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::session::IdentitySource;
use crate::storage::{self, Storage, keys};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule.
const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// A registered account as stored.
#[derive(Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: Email,
    pub password: String,
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl UserRecord {
    fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    fn matches_identifier(&self, identifier: &str) -> bool {
        self.email.as_str() == identifier || self.name == identifier
    }
}

/// Signup, login and logout over a storage backend.
#[derive(Clone)]
pub struct AccountService {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}

impl AccountService {
    /// Create an account service.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All registered accounts.
    #[must_use]
    pub fn users(&self) -> Vec<UserRecord> {
        storage::read_list(self.storage.as_ref(), keys::USERS)
    }

    /// Register a new account.
    ///
    /// Name, email and password are trimmed first.
    ///
    /// # Errors
    ///
    /// Checked in this order: `AccountError::EmptyName` for a blank name,
    /// `AccountError::WeakPassword` naming the first password rule broken,
    /// `AccountError::InvalidEmail` for a bad email, `AccountError::AlreadyExists`
    /// if the email is taken, and `AccountError::Storage` if the account
    /// cannot be saved.
    #[instrument(skip(self, password))]
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentitySnapshot, AccountError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountError::EmptyName);
        }
        let password = password.expose_secret().trim();
        validate_password(password)?;
        let email = Email::parse(email)?;

        let mut users = self.users();
        if users.iter().any(|user| user.email == email) {
            return Err(AccountError::AlreadyExists);
        }

        let user = UserRecord {
            name: name.to_owned(),
            email,
            password: password.to_owned(),
        };
        let snapshot = user.snapshot();
        users.push(user);
        storage::write_list(self.storage.as_ref(), keys::USERS, &users)?;

        info!(email = %snapshot.email, "account created");
        Ok(snapshot)
    }

    /// Log in by email or display name.
    ///
    /// The first account whose email or name equals the (trimmed) identifier
    /// is checked.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if no account matches,
    /// `AccountError::IncorrectPassword` if the password is wrong, and
    /// `AccountError::Storage` if the login cannot be saved.
    #[instrument(skip(self, password))]
    pub fn login(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<IdentitySnapshot, AccountError> {
        let identifier = identifier.trim();
        let users = self.users();
        let user = users
            .iter()
            .find(|user| user.matches_identifier(identifier))
            .ok_or(AccountError::UserNotFound)?;

        if user.password != password.expose_secret().trim() {
            warn!(email = %user.email, "login with incorrect password");
            return Err(AccountError::IncorrectPassword);
        }

        let snapshot = user.snapshot();
        storage::write_value(self.storage.as_ref(), keys::LOGGED_IN_USER, &snapshot)?;

        info!(email = %snapshot.email, "logged in");
        Ok(snapshot)
    }

    /// Log out. Logging out while logged out is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the login record cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), AccountError> {
        self.storage.remove_item(keys::LOGGED_IN_USER)?;
        info!("logged out");
        Ok(())
    }
}

impl IdentitySource for AccountService {
    fn current_user(&self) -> Option<IdentitySnapshot> {
        storage::read_value(self.storage.as_ref(), keys::LOGGED_IN_USER)
    }
}

/// Check a password against the signup rules, in order.
///
/// # Errors
///
/// Returns `AccountError::WeakPassword` with the first rule broken.
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    let rule = if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(PasswordRule::MinLength)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(PasswordRule::Uppercase)
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some(PasswordRule::Lowercase)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(PasswordRule::Digit)
    } else if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        Some(PasswordRule::Special)
    } else {
        None
    };

    rule.map_or(Ok(()), |rule| Err(AccountError::WeakPassword(rule)))
}

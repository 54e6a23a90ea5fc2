//! Unified error handling.
//!
//! Provides a unified `AppError` type for everything a front end can hit.
//! Front ends show [`AppError::user_message`] and call [`AppError::report`]
//! so internal failures are logged once, with details, at `error` level.

use thiserror::Error;

use crate::accounts::AccountError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::session::CartError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Signup, login or logout failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Cart operation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this is a failure on our side rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storage(_) | Self::Config(_) | Self::Account(AccountError::Storage(_)) => true,
            Self::Catalog(err) => err.is_unavailable(),
            Self::Account(_) | Self::Cart(_) | Self::BadRequest(_) => false,
        }
    }

    /// Message safe to show to the user.
    ///
    /// Internal error details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) | Self::Account(AccountError::Storage(_)) => {
                "Your changes could not be saved.".to_string()
            }
            Self::Config(err) => err.to_string(),
            Self::Catalog(err) => err.user_message(),
            Self::Account(AccountError::InvalidEmail(_)) => "Invalid email address.".to_string(),
            Self::Account(AccountError::EmptyName) => "Please enter your name.".to_string(),
            Self::Account(err) => err.to_string(),
            Self::Cart(CartError::InvalidItem(_)) => {
                "This book cannot be added to the cart.".to_string()
            }
            Self::Cart(CartError::IndexOutOfRange { len, .. }) => {
                format!("No such cart line (the cart has {len} items).")
            }
            Self::BadRequest(message) => message.clone(),
        }
    }

    /// Log the error with full details. Internal errors go to `error`,
    /// everything else to `debug`.
    pub fn report(&self) {
        if self.is_internal() {
            tracing::error!(error = %self, "Command failed");
        } else {
            tracing::debug!(error = %self, "Command rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

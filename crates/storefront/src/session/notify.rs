//! Collaborators the cart session talks to.
//!
//! The session owns cart state; everything user-facing goes through these
//! traits so the same session drives a terminal, a test harness or any
//! other front end.

use bookpedia_core::{IdentitySnapshot, Price};
use thiserror::Error;

use super::view::CartView;

/// Supplies the currently logged-in user.
pub trait IdentitySource {
    /// The logged-in user, or `None` when logged out.
    fn current_user(&self) -> Option<IdentitySnapshot>;
}

/// Receives a fresh [`CartView`] after every cart change.
pub trait CartObserver {
    fn cart_changed(&self, view: &CartView);
}

/// What the user is asked to confirm at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub item_count: usize,
    pub total: Price,
}

/// User-facing notifications raised by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A book was added to the cart.
    Added { title: String },
    /// Checkout went through.
    Purchased { count: usize, total: Price },
    /// A change could not be saved; the in-memory cart still has it.
    StorageWarning { message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { title } => write!(f, "Added \"{title}\""),
            Self::Purchased { count, total } => {
                write!(f, "Purchased {count} book(s) for {total}")
            }
            Self::StorageWarning { message } => write!(f, "Warning: {message}"),
        }
    }
}

/// A notification could not be delivered.
#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NoticeError(pub String);

/// Asks the user questions and shows them notifications.
pub trait Prompter {
    /// Ask the user to confirm a checkout. `false` cancels it.
    fn confirm_checkout(&self, summary: &CheckoutSummary) -> bool;

    /// Show a notification.
    ///
    /// # Errors
    ///
    /// Returns `NoticeError` if the notification could not be shown. The
    /// session logs it and carries on.
    fn notify(&self, notice: &Notice) -> Result<(), NoticeError>;
}

/// Answers every checkout prompt the same way and drops notifications.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Prompter for AutoConfirm {
    fn confirm_checkout(&self, _summary: &CheckoutSummary) -> bool {
        self.0
    }

    fn notify(&self, _notice: &Notice) -> Result<(), NoticeError> {
        Ok(())
    }
}

impl IdentitySource for Option<IdentitySnapshot> {
    fn current_user(&self) -> Option<IdentitySnapshot> {
        self.clone()
    }
}

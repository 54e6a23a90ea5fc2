//! The logged-in user as seen by the cart.

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Who is logged in right now.
///
/// Owned by the account service; the cart only reads it to gate checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    /// Display name given at signup.
    pub name: String,
    /// Account email.
    pub email: Email,
}
